use clap::{Parser as ClapParser, Subcommand};
use cosmos_sql::cli::{self, CliError, Command, CommandOptions, CommandResult};
use cosmos_sql::ParserOptions;
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "cosmos-sql")]
#[command(about = "Parse, format, hash and obfuscate Cosmos SQL queries")]
#[command(version)]
struct Cli {
    /// Maximum nesting depth accepted by the parser
    #[arg(long, global = true, default_value_t = ParserOptions::default().max_depth)]
    max_depth: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate query syntax
    Check {
        /// The query (reads from stdin if not provided)
        query: Option<String>,
    },

    /// Print the query in canonical form
    Format {
        /// The query (reads from stdin if not provided)
        query: Option<String>,

        /// One clause per line
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print structural hashes of the query as JSON
    Hash {
        /// The query (reads from stdin if not provided)
        query: Option<String>,

        /// Only report the order-sensitive hash
        #[arg(short, long)]
        strict: bool,
    },

    /// Print the query with identifying values replaced
    Obfuscate {
        /// The query (reads from stdin if not provided)
        query: Option<String>,

        /// One clause per line
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let parser = ParserOptions {
        max_depth: cli.max_depth,
    };

    let (command, query, pretty, strict) = match cli.command {
        Commands::Check { query } => (Command::Check, query, false, false),
        Commands::Format { query, pretty } => (Command::Format, query, pretty, false),
        Commands::Hash { query, strict } => (Command::Hash, query, false, strict),
        Commands::Obfuscate { query, pretty } => (Command::Obfuscate, query, pretty, false),
    };

    let result = read_query(query).and_then(|query| {
        let options = CommandOptions {
            query,
            pretty,
            strict,
            parser,
        };
        run(command, &options)
    });

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_query(query: Option<String>) -> Result<String, CliError> {
    match query {
        Some(q) => Ok(q),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        None => Err(CliError::NoInput),
    }
}

fn run(command: Command, options: &CommandOptions) -> Result<(), CliError> {
    match cli::execute(command, options)? {
        CommandResult::SyntaxValid => println!("Syntax is valid"),
        CommandResult::Text(text) => println!("{}", text),
        CommandResult::Report(report) => {
            let json = if options.pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{}", json);
        }
    }
    Ok(())
}
