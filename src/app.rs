use std::collections::BTreeMap;
use std::io::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::domain::entities::metrics::start_date_days_ago;
use crate::domain::entities::query::{Filters, QueryState, SortDirection, SortSpec, PAGE_SIZE_OPTIONS};
use crate::domain::entities::resource::{CampaignType, ResourceKind};
use crate::infra::export::csv::write_export_file;
use crate::infra::http::client::ApiClient;
use crate::infra::proxy::{router, ProxyState};
use crate::platform::config::Config;
use crate::ui::render::{render_campaigns, render_creators, render_metrics, render_products};
use crate::ui::state::creator_view::CreatorView;
use crate::ui::state::product_view::ProductView;
use crate::usecase::services::debounce::Debouncer;
use crate::usecase::services::export_service::{ExportError, ExportService};
use crate::usecase::services::query_service::QueryService;

#[derive(Debug, Parser)]
#[command(name = "tap-dashboard", version, about = "TikTok partner campaign dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the CORS proxy in front of the analytics API.
    Serve,
    /// Show one page of campaign products.
    Products(ProductArgs),
    /// Show creators, searched and sorted locally.
    Creators(CreatorArgs),
    /// List campaigns, optionally by type.
    Campaigns {
        #[arg(long = "type", default_value = "all")]
        campaign_type: CampaignType,
    },
    /// Show the program summary for the last N days.
    Metrics {
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// Write every matching record of a resource to a CSV file.
    Export(ExportArgs),
    /// Read product searches from stdin and show results as typing settles.
    WatchProducts(PageArgs),
}

#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    #[arg(long, default_value_t = 50, value_parser = parse_page_size)]
    pub limit: u64,
    #[arg(long, default_value_t = 0)]
    pub offset: u64,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ProductFilterArgs {
    #[arg(long)]
    pub product_id: Option<String>,
    #[arg(long)]
    pub campaign_id: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub shop_name: Option<String>,
}

impl ProductFilterArgs {
    fn filters(&self) -> Filters {
        collect_filters([
            ("product_id", &self.product_id),
            ("campaign_id", &self.campaign_id),
            ("name", &self.name),
            ("shop_name", &self.shop_name),
        ])
    }
}

#[derive(Debug, Clone, Args)]
pub struct ProductArgs {
    #[command(flatten)]
    pub page: PageArgs,
    #[command(flatten)]
    pub filters: ProductFilterArgs,
}

#[derive(Debug, Clone, Default, Args)]
pub struct CreatorFilterArgs {
    /// Matches username, Discord name, either ID or region.
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
}

impl CreatorFilterArgs {
    fn filters(&self) -> Filters {
        collect_filters([("q", &self.search), ("region", &self.region)])
    }
}

#[derive(Debug, Clone, Args)]
pub struct CreatorArgs {
    #[command(flatten)]
    pub page: PageArgs,
    #[command(flatten)]
    pub filters: CreatorFilterArgs,
    /// Numeric field to sort by.
    #[arg(long)]
    pub sort: Option<String>,
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    pub resource: ResourceKind,
    #[command(flatten)]
    pub products: ProductFilterArgs,
    #[command(flatten)]
    pub creators: CreatorFilterArgs,
    #[arg(long = "type")]
    pub campaign_type: Option<CampaignType>,
}

impl ExportArgs {
    fn filters(&self) -> Filters {
        match self.resource {
            ResourceKind::Products => self.products.filters(),
            ResourceKind::Creators => self.creators.filters(),
            ResourceKind::Campaigns => self
                .campaign_type
                .and_then(CampaignType::as_filter)
                .map(|wire_name| {
                    BTreeMap::from([("campaign_type".to_string(), wire_name.to_string())])
                })
                .unwrap_or_default(),
        }
    }
}

fn collect_filters<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a Option<String>)>) -> Filters {
    pairs
        .into_iter()
        .filter_map(|(name, value)| {
            let value = value.as_deref()?.trim();
            (!value.is_empty()).then(|| (name.to_string(), value.to_string()))
        })
        .collect()
}

fn parse_page_size(raw: &str) -> Result<u64, String> {
    let size: u64 = raw.parse().map_err(|_| format!("not a number: {raw}"))?;
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(format!("page size must be one of {PAGE_SIZE_OPTIONS:?}"))
    }
}

fn query_state(page: &PageArgs, filters: &Filters) -> QueryState {
    let mut query = QueryState::new(page.limit);
    for (name, value) in filters {
        query.set_filter(name.as_str(), value.as_str());
    }
    query.skip_to(page.offset);
    query
}

fn query_service(config: &Config) -> Result<QueryService> {
    let client = ApiClient::new(&config.dashboard_api_url, config.request_timeout)?;
    Ok(QueryService::new(Arc::new(client)))
}

pub async fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Command::Serve => serve(&config).await,
        Command::Products(args) => {
            let service = query_service(&config)?;
            let mut view = ProductView::new(query_state(&args.page, &args.filters.filters()));
            view.load(&service).await;
            print!("{}", render_products(&view));
            Ok(())
        }
        Command::Creators(args) => {
            let service = query_service(&config)?;
            let mut view = CreatorView::new(QueryState::new(args.page.limit));
            view.load(&service).await;
            for (name, value) in args.filters.filters() {
                view.set_filter(&name, &value);
            }
            if let Some(field) = args.sort {
                let sortable = ResourceKind::Creators.sortable_fields();
                if !sortable.contains(&field.as_str()) {
                    anyhow::bail!("cannot sort creators by {field}; choose one of {sortable:?}");
                }
                let direction = if args.desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                };
                view.set_sort(Some(SortSpec::new(field, direction)));
            }
            view.skip_to(args.page.offset);
            print!("{}", render_creators(&view));
            Ok(())
        }
        Command::Campaigns { campaign_type } => {
            let service = query_service(&config)?;
            let page = service.campaigns(campaign_type).await?;
            println!("{}", campaign_type.label());
            print!("{}", render_campaigns(&page));
            Ok(())
        }
        Command::Metrics { days } => {
            let service = query_service(&config)?;
            let start_date = start_date_days_ago(Local::now().date_naive(), days);
            let report = service.metrics(&start_date).await?;
            print!("{}", render_metrics(&report));
            Ok(())
        }
        Command::Export(args) => export(&config, &args).await,
        Command::WatchProducts(page) => watch_products(&config, &page).await,
    }
}

async fn serve(config: &Config) -> Result<()> {
    let state = ProxyState::new(&config.upstream_base_url, config.request_timeout)?;
    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, upstream = %config.upstream_base_url, "proxy listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

async fn export(config: &Config, args: &ExportArgs) -> Result<()> {
    let client = ApiClient::new(&config.dashboard_api_url, config.request_timeout)?;
    let service =
        ExportService::new(Arc::new(client)).with_batch_size(config.export_batch_size);

    let output = match service
        .export_all(args.resource, &args.filters(), Local::now().date_naive())
        .await
    {
        Ok(output) => output,
        Err(ExportError::Empty) => {
            println!("No {} to export", args.resource);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let path = write_export_file(&config.export_dir, &output.file_name, &output.contents)?;
    println!("Exported {} rows to {}", output.row_count, path.display());
    Ok(())
}

/// Each stdin line is the full contents of the product name search box.
async fn watch_products(config: &Config, page: &PageArgs) -> Result<()> {
    let service = query_service(config)?;
    let mut view = ProductView::new(QueryState::new(page.limit));
    view.load(&service).await;
    print!("{}", render_products(&view));

    let (input, mut debouncer) = Debouncer::new(config.search_debounce);
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if !input.push(line) {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(error = %err, "stdin closed");
                    break;
                }
            }
        }
    });

    while let Some(search) = debouncer.settled().await {
        view.set_filter("name", &search);
        view.load(&service).await;
        print!("{}", render_products(&view));
        std::io::stdout().flush().context("failed to flush stdout")?;
    }

    reader.await.context("stdin reader panicked")?;
    Ok(())
}
