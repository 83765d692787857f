use anyhow::{anyhow, Context, Result};
use clap::Parser;
use htmltex::{fix_headings, wiki, HtmlTexer, TexConfig};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const DEFAULT_PREAMBLE: &str = "\\documentclass[a4paper]{article}
\\usepackage[utf8]{inputenc}
\\usepackage{graphicx}
\\usepackage{xcolor}
";

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input HTML file.
    #[arg(long)]
    html_file: PathBuf,

    /// Output .tex path. Defaults to stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Folder holding the prepared image files.
    #[arg(long, default_value = "")]
    image_folder: PathBuf,

    /// File whose content replaces the default preamble.
    #[arg(long)]
    preamble_file: Option<PathBuf>,

    /// Do not emit \maketitle.
    #[arg(long)]
    no_maketitle: bool,

    /// Width budget (in ex) for autoscaled tables.
    #[arg(long, default_value_t = 80)]
    table_width: u32,

    /// Input is not well-formed XHTML; repair it while parsing.
    #[arg(long)]
    lenient: bool,

    /// Leave heading levels as they are instead of shifting the shallowest
    /// one up to a section.
    #[arg(long)]
    keep_headings: bool,

    /// Extra heading levels to add when shifting headings.
    #[arg(long, default_value_t = 0)]
    heading_shift: u8,

    /// Enable TikiWiki markup handling.
    #[arg(long)]
    wiki: bool,

    /// Print the image URLs found in the document and exit.
    #[arg(long)]
    list_images: bool,

    /// Print the parsed document tree before converting.
    #[arg(long)]
    dump_tree: bool,

    /// Verbose diagnostics.
    #[arg(long)]
    debug: bool,
}

fn read_to_string(path: &Path) -> Result<String> {
    let mut s = String::new();
    File::open(path)
        .with_context(|| format!("open {}", path.display()))?
        .read_to_string(&mut s)
        .with_context(|| format!("read {}", path.display()))?;
    Ok(s)
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let mut html = read_to_string(&args.html_file)?;
    if html.trim().is_empty() {
        return Err(anyhow!("empty html"));
    }
    if args.wiki {
        html = wiki::strip_nbsp(&html);
    }
    if !args.keep_headings {
        html = fix_headings(&html, args.heading_shift);
    }

    let preamble = match &args.preamble_file {
        Some(p) => read_to_string(p)?,
        None => DEFAULT_PREAMBLE.to_string(),
    };
    let config = TexConfig {
        preamble,
        image_folder: args.image_folder.clone(),
        maketitle: !args.no_maketitle,
        table_width: args.table_width,
        debug: args.debug,
        ..TexConfig::default()
    };

    let mut texer = HtmlTexer::new(config);
    if args.wiki {
        texer = texer.with_dispatcher(wiki::dispatcher());
    }
    let parsed = if args.lenient {
        texer.parse_html(&html)
    } else {
        texer.parse(&html)
    };
    let doc = parsed.with_context(|| format!("parse {}", args.html_file.display()))?;

    if args.dump_tree {
        eprintln!("--- DOM tree -----------------------------------------------");
        eprintln!("{}", doc.root().to_markup());
    }

    if args.list_images {
        for url in doc.images() {
            println!("{url}");
        }
        return Ok(());
    }

    let rendered = doc.render()?;
    if !rendered.diagnostics.is_empty() {
        log::info!("{} conversion problems", rendered.diagnostics.len());
    }

    match &args.out {
        Some(path) => {
            let mut f =
                File::create(path).with_context(|| format!("create {}", path.display()))?;
            f.write_all(rendered.tex.as_bytes())
                .with_context(|| format!("write {}", path.display()))?;
        }
        None => {
            std::io::stdout().write_all(rendered.tex.as_bytes())?;
        }
    }
    Ok(())
}
