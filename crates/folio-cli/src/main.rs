use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use folio_config::{Config, Role};
use folio_engine::{
    AuthorRole, Content, ContentStore, Encoder, FsContentStore, RenderHooks, RenderOptions,
    Renderer, surface::html, to_surface,
};
use relative_path::RelativePath;
use std::{
    fs,
    io::{Write, stdout},
    path::{Path, PathBuf},
    process,
};

/// Publish, reopen and render folio articles
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Content directory; overrides the config file
    #[arg(long, global = true)]
    content_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode an editor HTML surface and print the document JSON
    Encode {
        input: PathBuf,
        /// Author as a trusted author (code blocks allowed)
        #[arg(long)]
        trusted: bool,
    },

    /// Encode an editor HTML surface and store it under an article id
    Publish {
        id: String,
        input: PathBuf,
        #[arg(long)]
        trusted: bool,
    },

    /// Print the editor surface for a stored article
    Reopen { id: String },

    /// Render a stored article
    Render {
        id: String,
        /// Base URL for relative asset references; overrides the config file
        #[arg(long)]
        asset_base_url: Option<String>,
        /// Print the render tree as JSON instead of HTML
        #[arg(long)]
        tree: bool,
        /// Report every activatable node after rendering
        #[arg(long)]
        activations: bool,
    },

    /// Print the stored body of an article
    Show { id: String },

    /// List stored article ids
    List,
}

/// Reports activations on stdout.
struct PrintHooks;

impl RenderHooks for PrintHooks {
    fn image_activated(&self, src: &str) {
        println!("image\t{src}");
    }

    fn link_activated(&self, href: &str) {
        println!("link\t{href}");
    }
}

/// Settings resolved from the config file and command-line overrides.
#[derive(Debug)]
struct Settings {
    content_root: Option<PathBuf>,
    render: RenderOptions,
    role: AuthorRole,
}

impl Settings {
    fn resolve(config: Option<Config>, content_root: Option<PathBuf>) -> Self {
        let (root, render, role) = match config {
            Some(config) => (
                Some(config.content_root),
                RenderOptions {
                    asset_base_url: config.render.asset_base_url,
                    frame_aspect_ratio: config.render.frame_aspect_ratio,
                },
                author_role(config.authoring.role),
            ),
            None => (None, RenderOptions::default(), AuthorRole::default()),
        };
        Self {
            content_root: content_root.or(root),
            render,
            role,
        }
    }

    fn store(&self) -> Result<FsContentStore> {
        let root = self.content_root.as_ref().ok_or_else(|| {
            anyhow!("No content root: pass --content-root or set content_root in the config file")
        })?;
        FsContentStore::open(root)
            .with_context(|| format!("Failed to open content root {}", root.display()))
    }

    fn encoder(&self, trusted: bool) -> Encoder {
        if trusted {
            Encoder::trusted()
        } else {
            Encoder::new(self.role)
        }
    }
}

fn author_role(role: Role) -> AuthorRole {
    match role {
        Role::Contributor => AuthorRole::Contributor,
        Role::Trusted => AuthorRole::Trusted,
    }
}

fn read_surface(input: &Path) -> Result<String> {
    fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}

fn run(command: Command, settings: &Settings, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Encode { input, trusted } => {
            let surface = html::parse(&read_surface(&input)?);
            let doc = settings.encoder(trusted).encode(&surface);
            writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
        }
        Command::Publish { id, input, trusted } => {
            let store = settings.store()?;
            let surface = html::parse(&read_surface(&input)?);
            let doc = settings.encoder(trusted).encode(&surface);
            store.save(RelativePath::new(&id), &doc)?;
            log::info!("Published {id} ({} block(s))", doc.blocks.len());
        }
        Command::Reopen { id } => {
            let doc = settings.store()?.fetch(RelativePath::new(&id))?.to_document();
            writeln!(out, "{}", html::write_inner(&to_surface(&doc)))?;
        }
        Command::Render {
            id,
            asset_base_url,
            tree,
            activations,
        } => {
            let content = settings.store()?.fetch(RelativePath::new(&id))?;
            let mut options = settings.render.clone();
            if asset_base_url.is_some() {
                options.asset_base_url = asset_base_url;
            }
            let renderer = Renderer::new(options).with_hooks(PrintHooks);
            let node = renderer.render_content(&content);

            if tree {
                writeln!(out, "{}", serde_json::to_string_pretty(&node)?)?;
            } else {
                writeln!(out, "{}", node.inner_html())?;
            }
            if activations {
                for activation in node.activations() {
                    renderer.activate(activation);
                }
            }
        }
        Command::Show { id } => match settings.store()?.fetch(RelativePath::new(&id))? {
            Content::Structured(doc) => writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?,
            Content::Legacy(text) => writeln!(out, "{text}")?,
        },
        Command::List => {
            for id in settings.store()?.list()? {
                writeln!(out, "{id}")?;
            }
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    log::debug!("Config path: {}", config_path.display());
    let config = match Config::load_from_path(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let settings = Settings::resolve(config, cli.content_root);
    if let Err(e) = run(cli.command, &settings, &mut stdout().lock()) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
