use std::fs;
use std::path::{Path, PathBuf};

use foxgrove_engine::{
    build_def_database, compile_defs_from_str, resolve_app_paths, ContentCompileError,
    ContentPipelineError, DefDatabase, LoopConfig, StartupError,
};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::gameplay::{build_first_world, LevelBuildError, SimTuning, TuningError, World};

const TUNING_ENV_VAR: &str = "FOXGROVE_TUNING";
const FRAMES_ENV_VAR: &str = "FOXGROVE_FRAMES";
const DEFAULT_FRAMES: u32 = 600;
const DEMO_CONTENT_PATH: &str = "builtin/demo.xml";
const DEMO_CONTENT: &str = include_str!("../../../../assets/base/demo.xml");

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Content(#[from] ContentPipelineError),
    #[error("built-in demo content failed to compile: {0}")]
    DemoContent(#[source] ContentCompileError),
    #[error("failed to read tuning file {path}: {source}")]
    ReadTuning {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("tuning file {path}: {source}")]
    Tuning {
        path: PathBuf,
        #[source]
        source: TuningError,
    },
    #[error(transparent)]
    Level(#[from] LevelBuildError),
}

pub struct AppWiring {
    pub config: LoopConfig,
    pub world: World,
    pub frames: u32,
}

pub fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Foxgrove Startup ===");

    let config = LoopConfig::default();
    let tuning = load_tuning()?;
    let db = load_content()?;
    let world = build_first_world(&db, tuning, config.viewport)?;
    let frames = parse_frames_from_env();

    Ok(AppWiring {
        config,
        world,
        frames,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn load_tuning() -> Result<SimTuning, BootstrapError> {
    let Some(path) = std::env::var_os(TUNING_ENV_VAR).map(PathBuf::from) else {
        return Ok(SimTuning::default());
    };
    let tuning = tuning_from_file(&path)?;
    info!(path = %path.display(), "tuning_loaded");
    Ok(tuning)
}

fn tuning_from_file(path: &Path) -> Result<SimTuning, BootstrapError> {
    let raw = fs::read_to_string(path).map_err(|source| BootstrapError::ReadTuning {
        path: path.to_path_buf(),
        source,
    })?;
    SimTuning::from_json_str(&raw).map_err(|source| BootstrapError::Tuning {
        path: path.to_path_buf(),
        source,
    })
}

fn load_content() -> Result<DefDatabase, BootstrapError> {
    let paths = resolve_app_paths()?;
    if paths.base_content_dir.is_dir() {
        return Ok(build_def_database(&paths)?);
    }
    warn!(
        content_dir = %paths.base_content_dir.display(),
        "content_dir_missing_using_builtin_demo"
    );
    demo_database()
}

fn demo_database() -> Result<DefDatabase, BootstrapError> {
    compile_defs_from_str(Path::new(DEMO_CONTENT_PATH), DEMO_CONTENT)
        .map_err(BootstrapError::DemoContent)
}

fn parse_frames_from_env() -> u32 {
    let Ok(raw) = std::env::var(FRAMES_ENV_VAR) else {
        return DEFAULT_FRAMES;
    };
    match raw.trim().parse::<u32>() {
        Ok(frames) => frames,
        Err(_) => {
            warn!(value = %raw, default = DEFAULT_FRAMES, "invalid_frame_count_using_default");
            DEFAULT_FRAMES
        }
    }
}
