use clap::{Parser, Subcommand};
use jadeite_render::{ConditionalMode, RenderOptions};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "jadeite")]
#[command(about = "jadeite: indentation-based template to markup compiler")]
#[command(version)]
struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a template to markup
    Build {
        /// Input template file
        path: String,

        /// Output file (defaults to <stem>.html next to the input)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Line breaks and two-space indentation
        #[arg(long)]
        pretty: bool,

        /// Escape text and attribute values
        #[arg(long)]
        encode: bool,

        /// Define a flag for `if` predicates (repeatable)
        #[arg(short = 'D', long = "define", value_name = "NAME")]
        defines: Vec<String>,

        /// Render the then-branch of every `if`
        #[arg(long, conflicts_with = "defines")]
        then_branch: bool,
    },

    /// Check a template for errors without writing output
    Check {
        /// Input template file
        path: String,
    },

    /// Print the token stream of a template
    Tokens {
        /// Input template file
        path: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Build {
            path,
            out,
            pretty,
            encode,
            defines,
            then_branch,
        } => {
            let mut options = if pretty {
                RenderOptions::pretty()
            } else {
                RenderOptions::default()
            };
            options.auto_encode = encode;
            options.conditionals = if then_branch {
                ConditionalMode::ThenBranch
            } else if !defines.is_empty() {
                ConditionalMode::Flags(defines.into_iter().collect())
            } else {
                ConditionalMode::ElseBranch
            };
            cmd_build(&path, out, &options);
        }
        Command::Check { path } => cmd_check(&path),
        Command::Tokens { path } => cmd_tokens(&path),
    }
}

fn fail(message: String) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        fail(format!("Error: file not found: {path}"));
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => fail(format!("Error reading {path}: {e}")),
    }
}

/// `<stem>.html` in the directory of the source.
fn default_output(path: &str) -> PathBuf {
    let p = Path::new(path);
    let stem = p
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());
    let dir = p.parent().unwrap_or(Path::new("."));
    dir.join(format!("{stem}.html"))
}

fn compile(path: &str, source: &str, options: &RenderOptions) -> String {
    let template = match jadeite_parser::parse(source) {
        Ok(template) => template,
        Err(e) => fail(format!("Parse error in {path}: {e}")),
    };

    match jadeite_render::render_with(&template, options) {
        Ok(html) => html,
        Err(e) => fail(format!("Render error in {path}: {e}")),
    }
}

fn cmd_build(path: &str, out: Option<PathBuf>, options: &RenderOptions) {
    let source = read_source(path);
    log::debug!("building {path} with {options:?}");

    let mut html = compile(path, &source, options);
    if !options.newline_marker.is_empty() && !html.is_empty() {
        html.push_str(&options.newline_marker);
    }

    let html_path = out.unwrap_or_else(|| default_output(path));
    if let Err(e) = std::fs::write(&html_path, &html) {
        fail(format!("Error writing {}: {e}", html_path.display()));
    }

    eprintln!("Built: {}", html_path.display());
}

fn cmd_check(path: &str) {
    let source = read_source(path);

    // Render too: unsupported nodes only fail at render time.
    compile(path, &source, &RenderOptions::default());

    eprintln!("OK: {path}");
}

fn cmd_tokens(path: &str) {
    let source = read_source(path);

    let tokens = match jadeite_lexer::Lexer::tokenize(&source) {
        Ok(tokens) => tokens,
        Err(e) => fail(format!("Lexer error in {path}: {e}")),
    };

    for token in &tokens {
        println!("{} {:?} {:?}", token.position, token.kind, token.text);
    }
}
