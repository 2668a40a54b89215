//! RPN Calculator - CLI Entry Point
//!
//! Commands:
//! - `rpn-calc run <script>` - Run a keystroke script file
//! - `rpn-calc eval "<keys>"` - Run keystrokes given on the command line
//! - `rpn-calc render <literal>` - Render a number for the display
//! - `rpn-calc repl` - Interactive keystroke prompt
//! - `rpn-calc test` - Built-in self-test

use clap::{Parser, Subcommand, ValueEnum};
use rpncalc::{Calculator, DispMode, ZeroMode, LINE_WIDTH, SHOW_WIDTH};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rpn-calc")]
#[command(author = "Yigit")]
#[command(version = "0.1.0")]
#[command(about = "A decimal128 RPN scientific calculator")]
struct Cli {
    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a keystroke script and print the stack
    Run {
        /// Path to the script file
        script: String,
        /// Display width used when printing
        #[arg(short, long, default_value_t = SHOW_WIDTH)]
        width: usize,
    },
    /// Run keystrokes given inline, e.g. "7 enter 3 +"
    Eval {
        keys: String,
        /// Display width used when printing
        #[arg(short, long, default_value_t = SHOW_WIDTH)]
        width: usize,
    },
    /// Render a number the way the display would
    Render {
        literal: String,
        #[arg(short, long, value_enum, default_value_t = ModeArg::Normal)]
        mode: ModeArg,
        #[arg(short, long, value_enum, default_value_t = ZeroArg::Trim)]
        zero: ZeroArg,
        #[arg(short, long, default_value_t = LINE_WIDTH)]
        width: usize,
    },
    /// Interactive prompt: one line of keystrokes at a time
    Repl {
        /// Resume file loaded at start and saved on exit
        #[arg(short, long)]
        state: Option<String>,
    },
    /// Run the built-in self-test
    Test,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Normal,
    Sci,
    Eng,
}

impl From<ModeArg> for DispMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Normal => DispMode::Normal,
            ModeArg::Sci => DispMode::Scientific,
            ModeArg::Eng => DispMode::Engineering,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ZeroArg {
    Pad,
    Trim,
}

impl From<ZeroArg> for ZeroMode {
    fn from(zero: ZeroArg) -> Self {
        match zero {
            ZeroArg::Pad => ZeroMode::Pad,
            ZeroArg::Trim => ZeroMode::Trim,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Run { script, width }) => {
            run_file(&script, width);
        }
        Some(Commands::Eval { keys, width }) => {
            eval_keys(&keys, width);
        }
        Some(Commands::Render { literal, mode, zero, width }) => {
            render_literal(&literal, mode.into(), zero.into(), width);
        }
        Some(Commands::Repl { state }) => {
            repl(state.as_deref());
        }
        Some(Commands::Test) => {
            run_self_test();
        }
        None => {
            println!("RPN Calculator v0.1.0");
            println!("Decimal128 arithmetic, 34 significant digits");
            println!();
            println!("Use --help for available commands");
            println!();
            demo();
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_stack(calc: &Calculator, width: usize) {
    let line = |name: &str, text: &str| println!("{:>6}: {:>width$}", name, text, width = width);
    line("T", calc.render_value(&calc.t(), width).as_str());
    line("Z", calc.render_value(&calc.z(), width).as_str());
    line("Y", calc.render_value(&calc.y(), width).as_str());
    line("X", calc.display_x(width).as_str());
    line("LastX", calc.render_value(&calc.last_x(), width).as_str());
    let flags = calc.last_exceptions();
    if !flags.is_empty() {
        println!("⚠️  {}", flags);
    }
}

fn run_source(source: &str, width: usize) {
    let mut calc: Calculator = Calculator::new();
    match rpncalc::run_script(&mut calc, source) {
        Ok(count) => {
            println!("⌨️  {} keys", count);
            println!();
            print_stack(&calc, width);
        }
        Err(e) => {
            eprintln!("❌ Script error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_file(path: &str, width: usize) {
    println!("🔧 Running: {}", path);
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("❌ Failed to read file: {}", e);
            std::process::exit(1);
        }
    };
    run_source(&source, width);
}

fn eval_keys(keys: &str, width: usize) {
    run_source(keys, width);
}

fn render_literal(literal: &str, mode: DispMode, zero: ZeroMode, width: usize) {
    use rpncalc::{Dec128, Decimal, Flags};

    let mut flags = Flags::NONE;
    let Some(value) = Dec128::parse(literal, &mut flags) else {
        eprintln!("❌ Not a number: {}", literal);
        std::process::exit(1);
    };
    println!("{}", rpncalc::render(&value, width, mode, zero));
    if !flags.is_empty() {
        println!("⚠️  {}", flags);
    }
}

fn repl(state_path: Option<&str>) {
    use rpncalc::{load_state, save_state, StateFile};
    use std::io::{BufRead, Write};

    let mut calc: Calculator = Calculator::new();
    if let Some(path) = state_path {
        if std::path::Path::new(path).exists() {
            match load_state(path) {
                Ok(file) => {
                    file.apply(&mut calc);
                    println!("📂 Resumed from {}", path);
                }
                Err(e) => {
                    eprintln!("❌ Failed to load state: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    println!("Type keystrokes (e.g. `7 enter 3 +`), `stack` to show all registers, `quit` to exit.");
    let stdin = std::io::stdin();
    loop {
        print!("[{}] > ", calc.settings());
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("❌ Read error: {}", e);
                break;
            }
        }

        match line.trim() {
            "quit" | "exit" => break,
            "stack" => {
                print_stack(&calc, SHOW_WIDTH);
                continue;
            }
            _ => {}
        }

        match rpncalc::run_script(&mut calc, &line) {
            Ok(_) => {
                let indicator = calc.var_indicator().map(|c| format!(" {}", c)).unwrap_or_default();
                println!("{:>width$}{}", calc.display_x(LINE_WIDTH).as_str(), indicator, width = LINE_WIDTH);
                let flags = calc.last_exceptions();
                if !flags.is_empty() {
                    println!("⚠️  {}", flags);
                }
            }
            Err(e) => eprintln!("❌ {}", e),
        }
    }

    if let Some(path) = state_path {
        if let Err(e) = save_state(path, &StateFile::capture(&calc)) {
            eprintln!("❌ Failed to save state: {}", e);
            std::process::exit(1);
        }
        println!("✓ Saved to {}", path);
    }
}

fn demo() {
    let examples = [
        ("0.1 + 0.2", ".1 enter .2 +"),
        ("2^0.5", "2 sqrt"),
        ("pi", "pi"),
        ("5!", "5 fact"),
        ("sin 30 (deg)", "30 sin"),
        ("1 / 0", "0 inv"),
    ];

    println!("━━━ Examples ━━━");
    println!();
    for (label, keys) in examples {
        let mut calc: Calculator = Calculator::new();
        if rpncalc::run_script(&mut calc, keys).is_ok() {
            println!("  {:<14} {:>16}", label, calc.display_x(LINE_WIDTH).as_str());
        }
    }
}

fn run_self_test() {
    use rpncalc::{Dec128, Decimal, Flags, Operation};

    println!("━━━ RPN Calculator Self-Test ━━━");
    println!();

    let mut passed = 0;
    let mut failed = 0;

    let eval = |keys: &str| {
        let mut calc: Calculator = Calculator::new();
        let _ = rpncalc::run_script(&mut calc, keys);
        calc
    };
    let mut check = |name: &str, got: String, expected: &str| {
        print!("{}... ", name);
        if got == expected {
            println!("✓");
            passed += 1;
        } else {
            println!("✗ (got {}, expected {})", got, expected);
            failed += 1;
        }
    };

    // Test 1: Exact decimal addition
    let calc = eval(".1 enter .2 +");
    check("Decimal 0.1 + 0.2", calc.display_x(LINE_WIDTH).to_string(), "0.3");

    // Test 2: Stack discipline
    let calc = eval("7 enter 3 +");
    let stack_ok = calc.y().is_zero() && calc.z().is_zero() && calc.t().is_zero();
    check("7 ENTER 3 +", calc.display_x(LINE_WIDTH).to_string(), "10");
    check("Stack drops after binary op", stack_ok.to_string(), "true");

    // Test 3: Display layouts
    let calc = eval("pi");
    check("Pi at 16 characters", calc.display_x(LINE_WIDTH).to_string(), "3.14159265358979");
    let calc = eval("1E20");
    check("Large value falls back to SCI", calc.render_x(LINE_WIDTH).to_string(), "1E+20");

    // Test 4: Exceptions
    let mut calc: Calculator = Calculator::new();
    let outcome = calc.apply(Operation::Reciprocal);
    let inf_ok = outcome.value == Dec128::INFINITY && outcome.flags.contains(Flags::DIV_ZERO);
    check("1/0 is Inf with div-by-zero", inf_ok.to_string(), "true");

    // Test 5: Exact powers
    let mut flags = Flags::NONE;
    let two = Dec128::from_i64(2);
    let p = two.pow(Dec128::from_i64(100), &mut flags);
    check("2^100 exact", (!flags.contains(Flags::INEXACT)).to_string(), "true");
    check("2^100", calc.render_value(&p, 40).to_string(), "1267650600228229401496703205376");

    // Test 6: Degrees
    let calc = eval("30 sin");
    check("sin 30 deg", calc.display_x(LINE_WIDTH).to_string(), "0.5");

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed == 0 {
        println!("✓ All tests passed!");
    } else {
        std::process::exit(1);
    }
}
