use std::fs;
use std::io::{self, Write};

use clap::Args;

use crate::cli_util::print_interpret_error;
use crate::config::{self, Settings};
use crate::interpreter::{EofPolicy, Interpreter};
use crate::tape::PointerPolicy;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Read Brainfuck code from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Concatenated Brainfuck code parts
    #[arg(value_name = "code", trailing_var_arg = true, allow_hyphen_values = true)]
    pub code: Vec<String>,

    /// Number of tape cells (fallback BF_TAPE_SIZE; default 1024)
    #[arg(short = 't', long = "tape-size", value_name = "N", value_parser = config::parse_tape_size)]
    pub tape_size: Option<usize>,

    /// Wrap the data pointer around the tape ends instead of failing
    #[arg(long = "wrap")]
    pub wrap: bool,

    /// Store 0 on end of input instead of failing
    #[arg(long = "eof-zero")]
    pub eof_zero: bool,

    /// Announce the loading and executing phases on stderr
    #[arg(long = "trace")]
    pub trace: bool,

    /// Print a step-by-step table of operations on stderr
    #[arg(short = 's', long = "steps")]
    pub steps: bool,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

impl RunArgs {
    /// Flag layer for config resolution. Unset switches defer to env and file.
    fn settings(&self) -> Settings {
        Settings {
            tape_size: self.tape_size,
            pointer_policy: self.wrap.then_some(PointerPolicy::Wrapping),
            eof: self.eof_zero.then_some(EofPolicy::Zero),
            debug_trace: self.trace.then_some(true),
        }
    }
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    if args.file.is_none() && args.code.is_empty() {
        usage_and_exit(program, 2);
    }

    if args.file.is_some() && !args.code.is_empty() {
        eprintln!("{program}: cannot use positional code together with --file");
        usage_and_exit(program, 2);
    }

    let mut config = match config::resolve(&args.settings()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{program}: configuration error: {e}");
            let _ = io::stderr().flush();
            return 1;
        }
    };
    config.step_trace = args.steps;

    let source = match &args.file {
        Some(path) => match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{program}: failed to read code file as UTF-8: {e}");
                let _ = io::stderr().flush();
                return 1;
            }
        },
        None => args.code.join(""),
    };

    let mut bf = Interpreter::with_config(config);
    let exit_code = match bf.interpret(&source) {
        Ok(_) => 0,
        Err(err) => {
            print_interpret_error(Some(program), &source, &err);
            1
        }
    };

    // For readability, ensure output ends with a newline
    println!();
    let _ = io::stdout().flush();
    exit_code
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [OPTIONS] "<code>"
  {0} run [OPTIONS] --file <PATH>

Options:
  --file,      -f <PATH>  Read Brainfuck code from PATH instead of positional "<code>"
  --tape-size, -t <N>     Number of tape cells (default 1024)
  --wrap                  Wrap the data pointer at both tape ends instead of failing
  --eof-zero              Store 0 when `,` hits end of input instead of failing
  --trace                 Announce the loading and executing phases on stderr
  --steps,     -s         Print a step-by-step table of operations on stderr
  --help,      -h         Show this help

Notes:
- Characters outside of Brainfuck's ><+-.,[] are comments and are ignored.
- Input (`,`) reads a single byte from stdin.
- Unset options fall back to BF_TAPE_SIZE, BF_POINTER_POLICY, BF_EOF and
  BF_DEBUG_TRACE, then to the [interpreter] section of bf.toml
  (BF_CONFIG or the XDG config directory).

Examples:
- Load Brainfuck code from a file:
    {0} run --file ./program.bf
- Read bytes from a file as stdin (`,` will consume file input):
    {0} run --eof-zero ",[.,]" < input.txt
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
