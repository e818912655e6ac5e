mod compiler;
mod database;
mod pipeline;

pub use compiler::{
    compile_def_database, compile_defs_from_str, ContentCompileError, ContentErrorCode,
    SourceLocation,
};
pub use database::{
    AreaDef, AreaDefId, DefDatabase, EnemyDef, EnemyDefId, EnemyPlacement, LevelDef,
    PropPlacement, TreePlacement, TriggerPlacement,
};
pub use pipeline::{build_def_database, ContentPipelineError};
