use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use worksheet_layout::{TemplateRegistry, WorksheetSpec};

#[derive(Parser)]
#[command(name = "wsgen", about = "Worksheet generator", version)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Paginate and render a worksheet to PDF
    Render {
        /// Worksheet JSON file (level, topic, problems)
        #[arg(long, conflicts_with_all = ["level", "topic", "problems"])]
        spec: Option<PathBuf>,

        /// Worksheet level, e.g. "3A" or "H"
        #[arg(long, required_unless_present = "spec", requires = "problems")]
        level: Option<String>,

        /// Worksheet title
        #[arg(long, default_value = "")]
        topic: String,

        /// Problems file: CSV (first column) or one problem per line
        #[arg(long)]
        problems: Option<PathBuf>,

        /// Output PDF file
        #[arg(short, long, required_unless_present = "plan_only")]
        output: Option<PathBuf>,

        /// Template registry JSON file (builtin levels when omitted)
        #[arg(long)]
        templates: Option<PathBuf>,

        /// Render configuration JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Backends to try, in order; repeat to build a chain
        #[arg(long, value_enum)]
        backend: Vec<BackendArg>,

        /// Time limit per backend attempt
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Print the page plan without rendering
        #[arg(long)]
        plan_only: bool,
    },

    /// Place worksheet copies side by side for duplex printing and cutting
    Impose {
        /// Rendered worksheet PDFs; even pages are fronts, odd pages backs
        #[arg(long, num_args = 1.., conflicts_with_all = ["fronts", "backs"], required_unless_present = "fronts")]
        copies: Vec<PathBuf>,

        /// Repeat every copy this many times
        #[arg(long, default_value = "1")]
        repeat: usize,

        /// PDFs forming the fronts stream
        #[arg(long, num_args = 1.., requires = "backs")]
        fronts: Vec<PathBuf>,

        /// PDFs forming the backs stream
        #[arg(long, num_args = 1.., requires = "fronts")]
        backs: Vec<PathBuf>,

        /// Output PDF file (two-sided output adds _fronts/_backs suffixes)
        #[arg(short, long, required_unless_present = "stats_only")]
        output: Option<PathBuf>,

        /// Imposition options JSON file; flags below override it
        #[arg(long)]
        options: Option<PathBuf>,

        /// Copies placed side by side on each sheet
        #[arg(long)]
        per_sheet: Option<usize>,

        /// Output paper size
        #[arg(long, value_enum)]
        paper: Option<PaperArg>,

        /// Output orientation
        #[arg(long, value_enum)]
        orientation: Option<OrientationArg>,

        /// Gap between copies in mm
        #[arg(long)]
        gap_mm: Option<f32>,

        /// Sheet margin in mm (uniform on all sides)
        #[arg(long)]
        sheet_margin: Option<f32>,

        /// Draw dashed cut guides in the gaps
        #[arg(long, action = ArgAction::Set)]
        cut_guides: Option<bool>,

        /// Draw crop marks at the corners of every copy
        #[arg(long, action = ArgAction::Set)]
        crop_marks: Option<bool>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },

    /// List registered levels and their templates
    Levels {
        /// Template registry JSON file (builtin levels when omitted)
        #[arg(long)]
        templates: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Tectonic,
    Xelatex,
    Pdflatex,
    Drawing,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    DoubleSided,
    TwoSided,
}

impl From<BackendArg> for worksheet_render::BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Tectonic => Self::Tectonic,
            BackendArg::Xelatex => Self::XeLatex,
            BackendArg::Pdflatex => Self::PdfLatex,
            BackendArg::Drawing => Self::Drawing,
        }
    }
}

impl From<PaperArg> for worksheet_layout::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
        }
    }
}

impl From<OrientationArg> for worksheet_layout::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl From<FormatArg> for worksheet_impose::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::DoubleSided => Self::DoubleSided,
            FormatArg::TwoSided => Self::TwoSided,
        }
    }
}

async fn load_registry(templates: Option<PathBuf>) -> Result<TemplateRegistry> {
    match templates {
        Some(path) => TemplateRegistry::load(&path)
            .await
            .with_context(|| format!("loading templates from {}", path.display())),
        None => Ok(TemplateRegistry::builtin()?.clone()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Render {
            spec,
            level,
            topic,
            problems,
            output,
            templates,
            config,
            backend,
            timeout_secs,
            plan_only,
        } => {
            let spec = match (spec, level, problems) {
                (Some(path), _, _) => WorksheetSpec::load(&path)
                    .await
                    .with_context(|| format!("loading worksheet from {}", path.display()))?,
                (None, Some(level), Some(path)) => {
                    let problems = worksheet_layout::load_problems(&path)
                        .await
                        .with_context(|| format!("loading problems from {}", path.display()))?;
                    WorksheetSpec::new(level, topic, problems)
                }
                _ => bail!("either --spec or --level with --problems is required"),
            };

            let registry = load_registry(templates).await?;

            if plan_only {
                let template = registry.resolve(&spec.level)?;
                let pages = worksheet_layout::paginate_worksheet(&spec, template)?;
                println!(
                    "Level {} uses template '{}': {} problems on {} pages",
                    spec.level,
                    template.name,
                    spec.problems.len(),
                    pages.len()
                );
                for page in &pages {
                    let numbers = page.numbers();
                    let range = match (numbers.first(), numbers.last()) {
                        (Some(first), Some(last)) => format!("problems {first}-{last}"),
                        _ => "no problems".to_string(),
                    };
                    println!(
                        "  page {} ({:?}, {}): {}",
                        page.index + 1,
                        page.role,
                        page.label.as_deref().unwrap_or("-"),
                        range
                    );
                }
                return Ok(());
            }

            let mut render_config = match config {
                Some(path) => worksheet_render::RenderConfig::load(&path)
                    .await
                    .with_context(|| format!("loading render config from {}", path.display()))?,
                None => worksheet_render::RenderConfig::default(),
            };
            if !backend.is_empty() {
                render_config.backends = backend.into_iter().map(Into::into).collect();
            }
            if let Some(secs) = timeout_secs {
                render_config.timeout_secs = secs;
            }

            let renderer = worksheet_render::FallbackRenderer::from_config(&render_config)?;
            let report = renderer.render_worksheet(&spec, &registry).await?;
            for failure in &report.failures {
                println!("  skipped {}", failure);
            }

            let Some(output) = output else {
                bail!("--output is required");
            };
            report.document.save(&output).await?;
            println!(
                "Rendered {} pages with {} → {}",
                report.document.page_count(),
                report.document.backend(),
                output.display()
            );
        }

        Commands::Impose {
            copies,
            repeat,
            fronts,
            backs,
            output,
            options,
            per_sheet,
            paper,
            orientation,
            gap_mm,
            sheet_margin,
            cut_guides,
            crop_marks,
            format,
            stats_only,
        } => {
            let mut options = match options {
                Some(path) => worksheet_impose::ImpositionOptions::load(&path)
                    .await
                    .with_context(|| format!("loading imposition options from {}", path.display()))?,
                None => worksheet_impose::ImpositionOptions::default(),
            };
            if let Some(k) = per_sheet {
                options.slots_per_sheet = k;
            }
            if let Some(paper) = paper {
                options.sheet_size = paper.into();
            }
            if let Some(orientation) = orientation {
                options.orientation = orientation.into();
            }
            if let Some(gap) = gap_mm {
                options.cut_gap_mm = gap;
            }
            if let Some(margin) = sheet_margin {
                options.sheet_margins = worksheet_impose::SheetMargins::uniform(margin);
            }
            if let Some(enabled) = cut_guides {
                options.marks.cut_guides = enabled;
            }
            if let Some(enabled) = crop_marks {
                options.marks.crop_marks = enabled;
            }
            if let Some(format) = format {
                options.output_format = format.into();
            }
            options.validate()?;

            let streams = if copies.is_empty() {
                let fronts = worksheet_impose::load_multiple_pdfs(&fronts).await?;
                let backs = worksheet_impose::load_multiple_pdfs(&backs).await?;
                worksheet_impose::DuplexStreams::new(fronts, backs)
            } else {
                let loaded = worksheet_impose::load_multiple_pdfs(&copies).await?;
                let repeated = loaded
                    .iter()
                    .flat_map(|doc| std::iter::repeat_n(doc, repeat.max(1)))
                    .cloned()
                    .collect();
                worksheet_impose::DuplexStreams::from_copies(repeated)
            };

            let stats = worksheet_impose::calculate_statistics(&streams, &options)?;
            println!("Imposition Statistics:");
            println!("  Copies: {}", stats.copies);
            println!("  Sheets: {}", stats.sheets);
            println!("  Output pages: {}", stats.output_pages);
            println!("  Empty slots: {}", stats.empty_slots);
            println!("  Scale: {:.3}", stats.scale);

            if stats_only {
                return Ok(());
            }

            let Some(output) = output else {
                bail!("--output is required");
            };
            let imposed = worksheet_impose::impose(streams, &options).await?;
            for path in worksheet_impose::save_imposed(imposed, &output).await? {
                println!("Imposed → {}", path.display());
            }
        }

        Commands::Levels { templates } => {
            let registry = load_registry(templates).await?;
            for (level, template) in registry.levels() {
                println!("{level:>4}  {template}");
            }
        }
    }

    Ok(())
}
