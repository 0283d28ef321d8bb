use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Confirm, CustomType, Select};
use weather_core::{Config, Document, Element, Shell};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Hourly temperature and precipitation forecast")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Html,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set whether the current location may be used, and where it is.
    Configure,

    /// List the configured locations.
    Locations,

    /// Show the forecast for a location by its title.
    Show {
        /// Location title, as listed by `weather locations`.
        title: String,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Print the whole page instead of the output area.
        #[arg(long)]
        page: bool,
    },

    /// Pick a location interactively and show its forecast.
    Pick {
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Print the page shell before any search.
    Page {
        #[arg(long, value_enum, default_value_t = Format::Html)]
        format: Format,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config from --config");
                Config::load_from(path)?
            }
            None => {
                tracing::debug!("loading config from the default location");
                Config::load()?
            }
        };

        match self.command {
            Command::Configure => configure(config, self.config.as_deref()),
            Command::Locations => {
                for location in &config.locations {
                    match location.coordinates() {
                        Some((lat, lng)) => println!("{}\t{lat}, {lng}", location.title),
                        None => println!("{}", location.title),
                    }
                }
                Ok(())
            }
            Command::Show {
                title,
                format,
                page,
            } => show(&config, &title, format, page).await,
            Command::Pick { format } => {
                let titles: Vec<String> =
                    config.locations.iter().map(|l| l.title.clone()).collect();
                let title = Select::new("Location:", titles).prompt()?;
                show(&config, &title, format, false).await
            }
            Command::Page { format } => {
                let shell = Shell::from_config(&config, &Document::new())?;
                print_tree(&shell.document().snapshot(), format);
                Ok(())
            }
        }
    }
}

async fn show(config: &Config, title: &str, format: Format, page: bool) -> anyhow::Result<()> {
    let shell = Shell::from_config(config, &Document::new())?;

    if !shell.activate(title) {
        tracing::warn!(title, known = ?shell.titles(), "unknown location requested");
        bail!(
            "Unknown location '{title}'.\n\
             Hint: run `weather locations` to see the configured titles."
        );
    }
    shell.settle().await;

    let tree = if page {
        shell.document().snapshot()
    } else {
        shell
            .output()
            .context("The page has no output area to show")?
    };

    print_tree(&tree, format);
    Ok(())
}

fn print_tree(tree: &Element, format: Format) {
    match format {
        Format::Html => println!("{tree}"),
        Format::Text => println!("{}", output::render_text(tree)),
    }
}

fn configure(mut config: Config, path: Option<&std::path::Path>) -> anyhow::Result<()> {
    let allow = Confirm::new("Allow the forecast to use your current location?")
        .with_default(true)
        .prompt()?;

    let position = if allow {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please type a number, e.g. 64.1355")
            .prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please type a number, e.g. -21.8954")
            .prompt()?;
        Some((latitude, longitude))
    } else {
        None
    };

    config.set_geolocation(allow, position);

    match path {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }

    println!("Saved geolocation settings.");
    Ok(())
}
