use clap::{Parser, Subcommand};
use markdocs::convert::{self, ConvertOptions, Origin};
use markdocs::generate::PUBLIC_ATTACHMENTS_PREFIX;
use markdocs::pipeline::{self, BuildOptions};
use markdocs::{config, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "markdocs")]
#[command(about = "Turn an Obsidian-flavoured Markdown vault into a documentation site tree")]
#[command(long_about = "\
Turn an Obsidian-flavoured Markdown vault into a documentation site tree

Your notes stay where they are. Every .md file is converted to MDX for the
site framework, folders are renamed through configured slugs, attached
images and videos are published, and navigation files are generated.

Source structure:

  docs/
  ├── _markdocs/
  │   ├── config.toml              # Names, links, page order, folder slugs
  │   └── favicon.png              # Optional site icon
  ├── attachments/                 # attachmentsDir: images and videos
  ├── Introduction.md              # front matter `name` sets the file name
  └── Guides/                      # [folders.\"Guides\"] slug = \"guides\"
      └── Installation.md

Output structure:

  site/
  ├── content/docs/                # .mdx documents + meta.json navigation
  ├── public/attached-files/       # Published attachments
  └── app/                         # icon.png, layout and home page edits

Run 'markdocs gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Docs directory
    #[arg(long, default_value = "docs", global = true)]
    source: PathBuf,

    /// Site directory receiving content/, public/ and app/
    #[arg(long, default_value = "site", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert every document and write the site tree
    Build,
    /// Convert every document and report warnings without writing anything
    Check,
    /// Convert a single document and print the result as JSON
    Convert {
        /// Markdown file to convert
        file: PathBuf,
        /// Editor the document was written with
        #[arg(long, value_enum, default_value_t = Origin::Default)]
        origin: Origin,
        /// Directory attachment references resolve against (default: the file's directory)
        #[arg(long)]
        attachments: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            println!(
                "==> Building {} → {}",
                cli.source.display(),
                cli.output.display()
            );
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_build_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = pipeline::run(
                &BuildOptions {
                    source: cli.source.clone(),
                    output: cli.output.clone(),
                },
                Some(tx),
            );
            printer.join().ok();
            let report = result?;
            output::print_build_summary(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let report = pipeline::check(&cli.source, None)?;
            output::print_check_output(&report);
            println!("==> Check complete");
        }
        Command::Convert {
            file,
            origin,
            attachments,
        } => {
            let content = std::fs::read_to_string(&file)?;
            let attachments_dir = attachments.unwrap_or_else(|| {
                file.parent()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_default()
            });
            let conversion = convert::convert_markdown(
                &content,
                &ConvertOptions {
                    origin,
                    attachments_dir,
                    rename_attachments: false,
                    public_prefix: PUBLIC_ATTACHMENTS_PREFIX.to_string(),
                },
            );
            println!("{}", serde_json::to_string_pretty(&conversion)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
