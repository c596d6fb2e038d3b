use clap::Parser;
use parrot::config::{HOST, PROMPT, VERSION};
use parrot::error::EvalError;
use parrot::interpreter::Interpreter;
use parrot::readline::history_path;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};
use std::path::PathBuf;
use std::process;

/// Parrot Lisp interpreter
#[derive(Parser, Debug)]
#[command(name = "parrot")]
#[command(version)]
#[command(about = "A Parrot Lisp interpreter with TCO, macros, and channels")]
struct CliArgs {
    /// Script file to execute (optional - if not provided, starts REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Arguments exposed to the script as *ARGV*
    #[arg(value_name = "ARG", trailing_var_arg = true)]
    args: Vec<String>,
}

fn main() {
    let cli = CliArgs::parse();

    let interpreter = match Interpreter::new() {
        Ok(interpreter) => interpreter,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    };

    if let Some(script) = cli.script {
        interpreter.set_argv(cli.args);
        if let Err(err) = interpreter.load_file(&script.to_string_lossy()) {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
        return;
    }

    if let Err(err) = repl(&interpreter) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn repl(interpreter: &Interpreter) -> Result<(), ReadlineError> {
    let config = Config::builder().auto_add_history(true).build();
    let mut editor = DefaultEditor::with_config(config)?;
    let _ = editor.load_history(&history_path());

    println!("Parrot {} [{}]", VERSION, HOST);

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => match interpreter.rep(&line) {
                Ok(output) => println!("{}", output),
                Err(EvalError::EmptyInput) => continue,
                Err(err) => eprintln!("Error: {}", err),
            },
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err),
        }
    }

    let _ = editor.save_history(&history_path());
    Ok(())
}
