//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, FeedConfig};
use crate::controller::{ListController, ListSettings, ListView};
use crate::error::{Error, Result, ResultExt};
use crate::fetch::{HttpPageFetcher, StrategySummary};
use crate::filter::{FilterCriteria, SortOrder};
use crate::pagination::LoadStatus;
use crate::types::OptionStringExt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Filter flags of the `browse` command
#[derive(Debug, Clone, Default)]
pub struct BrowseArgs {
    pub search: Option<String>,
    pub category: Option<String>,
    pub strategy_type: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<SortOrder>,
    pub pages: u32,
}

impl BrowseArgs {
    /// Criteria to start from: config defaults overridden by flags
    pub fn criteria(&self, defaults: &FilterCriteria) -> FilterCriteria {
        let mut criteria = defaults.clone();
        if let Some(search) = &self.search {
            criteria.search_term = search.trim().to_string();
        }
        if let Some(category) = &self.category {
            criteria.category.clone_from(category);
        }
        if let Some(strategy_type) = &self.strategy_type {
            criteria.strategy_type.clone_from(strategy_type);
        }
        if let Some(sort_by) = &self.sort_by {
            criteria.sort_by.clone_from(sort_by);
        }
        if let Some(order) = self.order {
            criteria.sort_order = order;
        }
        criteria
    }
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Browse {
                search,
                category,
                strategy_type,
                sort_by,
                order,
                pages,
            } => {
                let args = BrowseArgs {
                    search: search.clone(),
                    category: category.clone(),
                    strategy_type: strategy_type.clone(),
                    sort_by: sort_by.clone(),
                    order: *order,
                    pages: *pages,
                };
                self.browse(&args).await
            }
            Commands::Validate => self.validate(),
            Commands::Config => self.print_default_config(),
        }
    }

    /// Load the config file, or defaults when none was given
    fn load_config(&self) -> Result<FeedConfig> {
        match &self.cli.config {
            Some(path) => load_config(path),
            None => Ok(FeedConfig::default()),
        }
    }

    /// Load pages through a list controller and print the items
    async fn browse(&self, args: &BrowseArgs) -> Result<()> {
        let config = self.load_config()?;
        let fetcher = HttpPageFetcher::<StrategySummary>::from_config(&config)?;
        let criteria = args.criteria(&config.list.defaults);
        let settings = ListSettings::from_config(&config.list).with_defaults(criteria);
        info!(
            url = %config.api.base_url,
            path = %config.api.list_path,
            pages = args.pages,
            "Browsing strategies"
        );

        let started = Instant::now();
        let handle = ListController::spawn(Arc::new(fetcher), settings);
        let mut view = handle.wait_until_settled().await?;
        let mut printed = 0;

        for page in 1..=args.pages {
            if page > 1 {
                if !view.page.has_more {
                    break;
                }
                handle.load_next_page()?;
                view = handle.wait_until_settled().await?;
            }

            if let Some(error) = &view.page.last_error {
                if error.is_blocking() {
                    handle.dispose();
                    return Err(Error::Other(format!(
                        "Failed to load strategies: {}",
                        error.message
                    )));
                }
                warn!(page, error = %error, "Stopped loading more strategies");
                break;
            }

            self.print_items(&view.items()[printed..]);
            printed = view.items().len();

            if view.page.status == LoadStatus::End {
                break;
            }
        }

        handle.dispose();
        eprintln!("{}", summary_line(&view, started.elapsed().as_millis()));
        Ok(())
    }

    /// Validate the config file
    fn validate(&self) -> Result<()> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Config file not specified (use -c flag)"))?;
        let config = load_config(path)?;

        println!(
            "Config '{}' is valid: {}{} ({} per page)",
            path.display(),
            config.api.base_url.trim_end_matches('/'),
            config.api.list_path,
            config.list.page_size
        );
        Ok(())
    }

    /// Print the default config
    fn print_default_config(&self) -> Result<()> {
        let yaml = serde_yaml::to_string(&FeedConfig::default())
            .context("Failed to render default config")?;
        print!("{yaml}");
        Ok(())
    }

    /// Output items
    fn print_items(&self, items: &[StrategySummary]) {
        match self.cli.format {
            OutputFormat::Json => {
                for item in items {
                    println!("{}", serde_json::to_string(item).unwrap_or_default());
                }
            }
            OutputFormat::Pretty => {
                for item in items {
                    println!("{}", table_row(item));
                }
            }
        }
    }
}

/// One line of the pretty table
pub fn table_row(item: &StrategySummary) -> String {
    let metrics = item.metrics.as_ref();
    let total_return = metrics
        .and_then(|m| m.total_return)
        .map_or_else(|| "-".to_string(), |r| format!("{:.1}%", r * 100.0));
    let sharpe = metrics
        .and_then(|m| m.sharpe_ratio)
        .map_or_else(|| "-".to_string(), |s| format!("{s:.2}"));

    format!(
        "{:<14} {:<32} {:<12} {:<12} {:>9} {:>6}",
        truncate(&item.id, 14),
        truncate(&item.name, 32),
        truncate(&item.category.clone().none_if_empty().unwrap_or_else(dash), 12),
        truncate(&item.strategy_type.clone().none_if_empty().unwrap_or_else(dash), 12),
        total_return,
        sharpe
    )
}

/// Final status line written to stderr
pub fn summary_line<T>(view: &ListView<T>, elapsed_ms: u128) -> String {
    let total = view
        .page
        .total
        .map_or_else(|| "?".to_string(), |t| t.to_string());
    let status = if view.is_empty_result() {
        "no matching strategies".to_string()
    } else if view.end_marker {
        "end of list".to_string()
    } else {
        format!("{} pages loaded", view.page.page)
    };
    format!(
        "{} of {} strategies, {} ({}ms)",
        view.items().len(),
        total,
        status,
        elapsed_ms
    )
}

fn dash() -> String {
    "-".to_string()
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
