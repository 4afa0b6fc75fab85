use argh::FromArgs;
use minish::Interpreter;

#[derive(FromArgs)]
/// A small interactive shell: builtins, PATH lookup and output redirection.
struct Args {
    /// run a single command line and exit instead of starting the prompt
    #[argh(option, short = 'c')]
    command: Option<String>,
}

fn main() {
    let args: Args = argh::from_env();
    let mut interpreter = Interpreter::default();

    match args.command {
        Some(line) => {
            let code = interpreter.run_line(&line);
            std::process::exit(code);
        }
        None => {
            if let Err(err) = interpreter.repl() {
                eprintln!("{}", err);
                std::process::exit(1);
            }
        }
    }
}
