use anyhow::Result;

fn main() -> Result<()> {
    symptom_cli::main_entry()
}
