use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use orchard::export::job::JobEvent;
use orchard::fields::resolver::FieldResolver;
use orchard::scene::compose::{PageContext, compose_page, compose_pipeline};
use orchard::template::catalog::ElementDescriptor;
use orchard::{
    AnimationOptions, CancelToken, Capabilities, EngineConfig, ExportFormat, ExportSession,
    PageFormat, PipelineData, PipelineKind, ProductType, QualityTier, ReviewRecord, Stage,
    TemplateCatalog, TemplateVariant, Watermark,
};

#[derive(Parser, Debug)]
#[command(name = "orchard", version)]
struct Cli {
    /// Engine config JSON (defaults apply when omitted).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the page plan of a template as JSON.
    Plan(PlanArgs),
    /// Print resolved element values of a review as JSON.
    Resolve(ResolveArgs),
    /// Export one page of a review as an image.
    Export(ExportArgs),
    /// Export a pipeline timeline as an animated GIF.
    Animate(AnimateArgs),
}

#[derive(Parser, Debug)]
struct TemplateArgs {
    /// Product type (aliases accepted: fleur, kief, rosin, comestible, ...).
    #[arg(long)]
    product: Option<String>,

    #[arg(long, value_enum, default_value_t = VariantChoice::Standard)]
    variant: VariantChoice,

    /// Page format id (story, square, landscape, a4).
    #[arg(long, default_value = "square")]
    format: String,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[command(flatten)]
    template: TemplateArgs,
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Review JSON document.
    #[arg(long)]
    record: PathBuf,

    /// Element ids to resolve; defaults to every available element of the template.
    #[arg(long = "element")]
    elements: Vec<String>,

    #[command(flatten)]
    template: TemplateArgs,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Review JSON document.
    #[arg(long)]
    record: PathBuf,

    #[command(flatten)]
    template: TemplateArgs,

    /// 0-based page of the plan to export.
    #[arg(long, default_value_t = 0)]
    page: usize,

    /// Output format (png, jpeg, svg, gif).
    #[arg(long = "as", default_value = "png")]
    output: String,

    #[arg(long, value_enum, default_value_t = QualityChoice::Standard)]
    quality: QualityChoice,

    #[command(flatten)]
    output_opts: OutputArgs,
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    /// Pipeline JSON document.
    #[arg(long)]
    pipeline: PathBuf,

    /// Pipeline kind, used in the file name. Defaults to the pipeline's recorded type.
    #[arg(long)]
    kind: Option<String>,

    /// Title drawn above the grid.
    #[arg(long, default_value = "Pipeline")]
    title: String,

    /// Page format id used as the canvas.
    #[arg(long, default_value = "square")]
    format: String,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[command(flatten)]
    output_opts: OutputArgs,
}

#[derive(Parser, Debug)]
struct OutputArgs {
    /// Output directory (overrides the config).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Capability set JSON; the restricted set applies when omitted.
    #[arg(long)]
    capabilities: Option<PathBuf>,

    /// User watermark JSON.
    #[arg(long)]
    watermark: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantChoice {
    Minimal,
    Standard,
    Detailed,
    Custom,
}

impl From<VariantChoice> for TemplateVariant {
    fn from(v: VariantChoice) -> Self {
        match v {
            VariantChoice::Minimal => Self::Minimal,
            VariantChoice::Standard => Self::Standard,
            VariantChoice::Detailed => Self::Detailed,
            VariantChoice::Custom => Self::Custom,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum QualityChoice {
    Standard,
    High,
}

impl From<QualityChoice> for QualityTier {
    fn from(q: QualityChoice) -> Self {
        match q {
            QualityChoice::Standard => Self::Standard,
            QualityChoice::High => Self::High,
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Resolve(args) => cmd_resolve(args),
        Command::Export(args) => cmd_export(args, config),
        Command::Animate(args) => cmd_animate(args, config),
    }
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn product_for(args: &TemplateArgs, record: Option<&ReviewRecord>) -> anyhow::Result<ProductType> {
    if let Some(p) = &args.product {
        return Ok(ProductType::parse(p)?);
    }
    Ok(record
        .and_then(ReviewRecord::product)
        .unwrap_or(ProductType::DEFAULT))
}

fn available_ids(product: ProductType, variant: TemplateVariant) -> anyhow::Result<Vec<String>> {
    Ok(orchard::resolve_available(product.as_str(), variant)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{out}");
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let product = product_for(&args.template, None)?;
    let variant = args.template.variant.into();
    let ids = available_ids(product, variant)?;
    let plan = orchard::plan(&ids, PageFormat::from_id(&args.template.format), variant);
    print_json(&plan)
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let record = ReviewRecord::from_path(&args.record)?;
    let ids = if args.elements.is_empty() {
        let product = product_for(&args.template, Some(&record))?;
        available_ids(product, args.template.variant.into())?
    } else {
        args.elements
    };
    let resolver = FieldResolver::builtin();
    let values: BTreeMap<&str, _> = ids
        .iter()
        .map(|id| (id.as_str(), resolver.resolve(&record, id)))
        .collect();
    print_json(&values)
}

fn build_session(mut config: EngineConfig, opts: &OutputArgs) -> anyhow::Result<ExportSession> {
    if let Some(dir) = &opts.out_dir {
        config.output_dir = dir.clone();
    }
    let capabilities = match &opts.capabilities {
        Some(path) => read_json::<Capabilities>(path, "capabilities")?,
        None => Capabilities::restricted(),
    };
    let watermark = opts
        .watermark
        .as_deref()
        .map(|path| read_json::<Watermark>(path, "watermark"))
        .transpose()?;
    Ok(ExportSession::new(config)?
        .with_capabilities(capabilities)
        .with_watermark(watermark))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = std::fs::File::open(path)
        .with_context(|| format!("open {what} '{}'", path.display()))?;
    serde_json::from_reader(std::io::BufReader::new(f))
        .with_context(|| format!("parse {what} JSON"))
}

fn cmd_export(args: ExportArgs, config: EngineConfig) -> anyhow::Result<()> {
    let record = ReviewRecord::from_path(&args.record)?;
    let product = product_for(&args.template, Some(&record))?;
    let variant: TemplateVariant = args.template.variant.into();
    let format = PageFormat::from_id(&args.template.format);
    let output: ExportFormat = args.output.parse()?;

    let ids = available_ids(product, variant)?;
    let plan = orchard::plan(&ids, format, variant);
    if plan.exceeds_format_limit() {
        tracing::warn!(pages = plan.total_pages, max = format.max_pages(), "plan exceeds format page limit");
    }
    let page = plan
        .page(args.page)
        .with_context(|| format!("page {} not in plan of {} pages", args.page, plan.total_pages))?;

    let catalog = TemplateCatalog::builtin();
    let elements: Vec<&ElementDescriptor> = page
        .iter()
        .filter_map(|id| catalog.elements(product, variant).iter().find(|el| &el.id == id))
        .collect();

    let background = config.background_color()?;
    let ctx = PageContext {
        record: &record,
        resolver: FieldResolver::builtin(),
        format,
        background,
    };
    let stage = Stage::with_composition(compose_page(&ctx, &elements));

    let name = record.display_name().unwrap_or_default();
    let mut session = build_session(config, &args.output_opts)?.with_review_name(name);
    let out = session.export_static(&stage, output, args.quality.into())?;
    print_json(&out)
}

fn cmd_animate(args: AnimateArgs, config: EngineConfig) -> anyhow::Result<()> {
    let pipeline = PipelineData::from_path(&args.pipeline)?;
    let kind: Option<PipelineKind> = match args.kind.as_deref() {
        Some(kind) => Some(kind.parse()?),
        None => pipeline.pipeline_type().and_then(|t| t.parse().ok()),
    };

    let canvas = PageFormat::from_id(&args.format)
        .dimensions()
        .unwrap_or(orchard::scene::compose::FALLBACK_CANVAS);
    let background = config.background_color()?;
    let stage = Stage::with_composition(compose_pipeline(&pipeline, &args.title, canvas, background));

    let mut session = build_session(config, &args.output_opts)?;
    let cancel = CancelToken::new();
    let mut on_event = |event: JobEvent| match event {
        JobEvent::Progress(pct) => tracing::info!(progress = pct, "capturing"),
        JobEvent::State(state) => tracing::info!(%state, "job state"),
    };
    let out = session.export_animated(
        &stage,
        &pipeline,
        AnimationOptions {
            kind,
            width: args.width,
            height: args.height,
        },
        &cancel,
        &mut on_event,
    )?;
    print_json(&out)
}
