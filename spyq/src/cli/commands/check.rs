use crate::cli::app::CheckArgs;
use anyhow::{Context, Result};
use spyq_core::syntax::{check_python, contains_incomplete_functions};

pub fn execute(args: CheckArgs) -> Result<()> {
    let code = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let check = check_python(&code);
    if !check.is_valid {
        for issue in &check.issues {
            eprintln!("{}: {}", args.file.display(), issue);
        }
        std::process::exit(1);
    }

    let (has_stubs, stubs) = contains_incomplete_functions(&code);
    if has_stubs {
        for stub in &stubs {
            eprintln!(
                "{}:{}: incomplete function `{}`",
                args.file.display(),
                stub.start_line,
                stub.name
            );
        }
        std::process::exit(1);
    }

    println!("{}: OK", args.file.display());
    Ok(())
}
