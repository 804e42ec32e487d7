use clap::Parser;
use docmatch_api::RestApi;
use docmatch_core::{Architecture, Context, EngineConfig, SimilarityIndex, StopwordPolicy};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Best-match document retrieval with TF-IDF and word2vec
#[derive(Parser, Debug)]
#[command(name = "docmatch")]
#[command(about = "Find the most relevant document of a labeled corpus", long_about = None)]
struct Args {
    /// JSON config file; command line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Corpus root holding the split directories, manifest and stopwords
    #[arg(short, long)]
    corpus_dir: Option<PathBuf>,

    /// Label manifest, relative to the corpus root
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Stopword list, relative to the corpus root
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// HTTP API port
    #[arg(long, default_value_t = 5000)]
    http_port: u16,

    /// Word vector dimensionality
    #[arg(long)]
    dim: Option<usize>,

    /// Word2vec training epochs
    #[arg(long)]
    epochs: Option<usize>,

    /// Word2vec random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Train skip-gram instead of CBOW
    #[arg(long)]
    skip_gram: bool,

    /// Remove stopwords from the TF-IDF fit and from word2vec queries too
    #[arg(long)]
    unified_stopwords: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_json_file(path)?,
            None => EngineConfig::default(),
        };

        if let Some(dir) = &self.corpus_dir {
            config.corpus.root = dir.clone();
        }
        if let Some(manifest) = &self.manifest {
            config.corpus.manifest = manifest.clone();
        }
        if let Some(stopwords) = &self.stopwords {
            config.corpus.stopwords = stopwords.clone();
        }
        if let Some(dim) = self.dim {
            config.embedding.dim = dim;
        }
        if let Some(epochs) = self.epochs {
            config.embedding.epochs = epochs;
        }
        if let Some(seed) = self.seed {
            config.embedding.seed = seed;
        }
        if self.skip_gram {
            config.embedding.architecture = Architecture::SkipGram;
        }
        if self.unified_stopwords {
            config.stopword_policy = StopwordPolicy::Unified;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting docmatch v{}", env!("CARGO_PKG_VERSION"));
    let config = args.engine_config()?;
    info!("Corpus root: {:?}", config.corpus.root);
    info!("Stopword policy: {:?}", config.stopword_policy);

    // Build phase: blocking, and fatal on failure
    let context = Arc::new(tokio::task::spawn_blocking(move || Context::initialize(&config)).await??);
    info!(
        "Indexed {} documents ({} TF-IDF terms, {} word vectors)",
        context.corpus().len(),
        context.lexical().vocabulary_size(),
        context.embedding().model().len()
    );

    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(context, http_port).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("docmatch started successfully");
    info!("HTTP API: http://localhost:{}/process/{{tfidf,w2v}}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
