use anyhow::{Context, Result, ensure};
use clap::{Parser, Subcommand, ValueEnum};
use pb_core::{Language, ParseOptions, ParseResult, ReadoutStrategy, parse};

#[derive(Parser)]
#[command(name = "pb", about = "Assembly-calculus dependency parser")]
struct Cli {
    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a sentence into dependency triples
    Parse {
        /// Sentence text in the selected language
        sentence: String,

        #[arg(long, value_enum, default_value = "english")]
        language: LanguageArg,

        /// Simulation rounds per word
        #[arg(long, default_value_t = 20)]
        rounds: usize,

        /// Lexical assembly size
        #[arg(long, default_value_t = 20)]
        lex_k: usize,

        /// Synapse connection probability
        #[arg(long, default_value_t = 0.1)]
        density: f64,

        /// RNG seed for reproducible parses
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, value_enum, default_value = "fiber")]
        readout: StrategyArg,

        /// Emit JSON instead of plain triples
        #[arg(long)]
        json: bool,
    },

    /// Parse the bundled demonstration sentences
    Demo {
        /// RNG seed for reproducible parses
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LanguageArg {
    English,
    Russian,
    Chinese,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::English => Language::English,
            LanguageArg::Russian => Language::Russian,
            LanguageArg::Chinese => Language::Chinese,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Traverse the pruned activated-fiber history (default)
    Fiber,
    /// Traverse the language's static read-out table
    FixedMap,
    /// Reserved
    Natural,
}

impl From<StrategyArg> for ReadoutStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Fiber => ReadoutStrategy::FiberBased,
            StrategyArg::FixedMap => ReadoutStrategy::FixedMap,
            StrategyArg::Natural => ReadoutStrategy::Natural,
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Parse {
            sentence,
            language,
            rounds,
            lex_k,
            density,
            seed,
            readout,
            json,
        } => {
            ensure!(
                (0.0..=1.0).contains(&density),
                "--density must be within [0, 1]"
            );
            ensure!(lex_k > 0, "--lex-k must be positive");
            let options = ParseOptions {
                language: language.into(),
                density,
                lex_k,
                rounds,
                strategy: readout.into(),
                seed,
            };
            let result = parse(&sentence, &options)
                .with_context(|| format!("failed to parse {sentence:?}"))?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&result).context("failed to encode result")?
                );
            } else {
                print_result(&result);
            }
            Ok(())
        }
        Commands::Demo { seed } => cmd_demo(seed),
    }
}

fn print_result(result: &ParseResult) {
    println!("tokens: {}", result.tokens.join(" "));
    if result.dependencies.is_empty() {
        println!("(no dependencies)");
        return;
    }
    for dep in &result.dependencies {
        println!("{} -{}-> {}", dep.head, dep.relation, dep.dependent);
    }
}

fn cmd_demo(seed: Option<u64>) -> Result<()> {
    let samples = [
        (Language::English, "cats chase mice"),
        (Language::English, "dogs are bad"),
        (Language::Russian, "kot vidit sobaku"),
        (Language::Chinese, "你真温柔善良大度"),
    ];

    for (language, sentence) in samples {
        let options = ParseOptions {
            language,
            seed,
            ..ParseOptions::default()
        };
        println!("── {sentence}");
        let result = parse(sentence, &options)
            .with_context(|| format!("failed to parse {sentence:?}"))?;
        print_result(&result);
        println!();
    }
    Ok(())
}
