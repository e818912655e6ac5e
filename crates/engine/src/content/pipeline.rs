use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::AppPaths;

use super::compiler::{compile_def_database, ContentCompileError};
use super::database::DefDatabase;

#[derive(Debug, Error)]
pub enum ContentPipelineError {
    #[error("content directory not found: {path}")]
    MissingContentDir { path: PathBuf },
    #[error(transparent)]
    Compile(#[from] ContentCompileError),
}

/// Compiles the base content directory into a `DefDatabase`.
pub fn build_def_database(app_paths: &AppPaths) -> Result<DefDatabase, ContentPipelineError> {
    let content_dir = &app_paths.base_content_dir;
    if !content_dir.is_dir() {
        return Err(ContentPipelineError::MissingContentDir {
            path: content_dir.clone(),
        });
    }

    let database = compile_def_database(content_dir)?;
    info!(
        content_dir = %content_dir.display(),
        enemy_defs = database.enemy_defs().len(),
        area_defs = database.area_defs().len(),
        level_defs = database.level_defs().len(),
        "content_pipeline_summary"
    );
    Ok(database)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn paths_for(root: &std::path::Path) -> AppPaths {
        AppPaths {
            root: root.to_path_buf(),
            base_content_dir: root.join("assets").join("base"),
        }
    }

    #[test]
    fn missing_content_dir_is_reported() {
        let temp = TempDir::new().expect("temp");
        let err = build_def_database(&paths_for(temp.path())).expect_err("err");
        assert!(matches!(err, ContentPipelineError::MissingContentDir { .. }));
    }

    #[test]
    fn compile_errors_pass_through() {
        let temp = TempDir::new().expect("temp");
        let paths = paths_for(temp.path());
        fs::create_dir_all(&paths.base_content_dir).expect("mkdir");
        fs::write(paths.base_content_dir.join("bad.xml"), "<Defs>").expect("write");
        let err = build_def_database(&paths).expect_err("err");
        assert!(matches!(err, ContentPipelineError::Compile(_)));
    }

    #[test]
    fn compiles_base_content() {
        let temp = TempDir::new().expect("temp");
        let paths = paths_for(temp.path());
        fs::create_dir_all(&paths.base_content_dir).expect("mkdir");
        fs::write(
            paths.base_content_dir.join("areas.xml"),
            "<Defs><AreaDef><defName>meadow</defName><width>10</width><height>10</height></AreaDef></Defs>",
        )
        .expect("write");
        let db = build_def_database(&paths).expect("db");
        assert_eq!(db.area_defs().len(), 1);
    }
}
