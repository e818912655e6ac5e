use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};

use crate::app::{Rect, Vec2};

use super::database::{
    AreaDef, AreaDefId, DefDatabase, EnemyDef, EnemyDefId, EnemyPlacement, LevelDef,
    PropPlacement, TreePlacement, TriggerPlacement,
};

const DEFAULT_ENEMY_MAX_HEALTH: f32 = 3.0;
const DEFAULT_ENEMY_SPEED: f32 = 1.4;
const DEFAULT_ENEMY_AGGRO_RADIUS: f32 = 150.0;
const DEFAULT_ENEMY_ATTACK_RANGE: f32 = 60.0;
const DEFAULT_ENEMY_SCALE: f32 = 3.2;
const DEFAULT_ENEMY_FRAME_PX: f32 = 16.0;
const DEFAULT_AREA_MAP_SCALE: f32 = 4.0;
const DEFAULT_PROP_SIZE_PX: f32 = 16.0;
const DEFAULT_TREE_WIDTH_PX: f32 = 32.0;
const DEFAULT_TREE_HEIGHT_PX: f32 = 48.0;
const DEFAULT_TREE_SCALE: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentErrorCode {
    ReadFile,
    XmlMalformed,
    InvalidRoot,
    UnknownDefType,
    UnknownField,
    DuplicateField,
    MissingField,
    InvalidValue,
    DuplicateDef,
    UnresolvedReference,
}

#[derive(Debug, Clone)]
pub struct ContentCompileError {
    pub code: ContentErrorCode,
    pub message: String,
    pub file_path: PathBuf,
    pub location: Option<SourceLocation>,
}

impl fmt::Display for ContentCompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "{:?}: {} (file={}, line={}, column={})",
                self.code,
                self.message,
                self.file_path.display(),
                loc.line,
                loc.column
            ),
            None => write!(
                f,
                "{:?}: {} (file={})",
                self.code,
                self.message,
                self.file_path.display()
            ),
        }
    }
}

impl std::error::Error for ContentCompileError {}

#[derive(Default)]
struct CompiledDefs {
    enemies: Vec<(PathBuf, EnemyDef)>,
    areas: Vec<(PathBuf, AreaDef)>,
    levels: Vec<(PathBuf, LevelDef)>,
}

/// Compiles every `*.xml` file under `content_dir` (sorted by relative path)
/// into one database. Def names must be unique per def type.
pub fn compile_def_database(content_dir: &Path) -> Result<DefDatabase, ContentCompileError> {
    let xml_files = collect_xml_files_sorted(content_dir)
        .map_err(|error| read_error(error.path, error.source))?;

    let mut compiled = CompiledDefs::default();
    for xml_file in xml_files {
        let raw = fs::read_to_string(&xml_file)
            .map_err(|source| read_error(xml_file.clone(), source))?;
        parse_defs_document(&xml_file, &raw, &mut compiled)?;
    }
    finish(compiled)
}

/// Compiles a single in-memory document; `file_path` is only used for errors.
pub fn compile_defs_from_str(file_path: &Path, raw: &str) -> Result<DefDatabase, ContentCompileError> {
    let mut compiled = CompiledDefs::default();
    parse_defs_document(file_path, raw, &mut compiled)?;
    finish(compiled)
}

fn finish(compiled: CompiledDefs) -> Result<DefDatabase, ContentCompileError> {
    check_unique(
        compiled.enemies.iter().map(|(path, def)| (path, &def.def_name)),
        "EnemyDef",
    )?;
    check_unique(
        compiled.areas.iter().map(|(path, def)| (path, &def.def_name)),
        "AreaDef",
    )?;
    check_unique(
        compiled.levels.iter().map(|(path, def)| (path, &def.def_name)),
        "LevelDef",
    )?;

    let enemy_names = compiled
        .enemies
        .iter()
        .map(|(_, def)| def.def_name.as_str())
        .collect::<HashSet<_>>();
    let area_names = compiled
        .areas
        .iter()
        .map(|(_, def)| def.def_name.as_str())
        .collect::<HashSet<_>>();

    for (path, level) in &compiled.levels {
        if !area_names.contains(level.area.as_str()) {
            return Err(unresolved(
                path,
                format!(
                    "LevelDef '{}' references unknown AreaDef '{}'",
                    level.def_name, level.area
                ),
            ));
        }
        for enemy in &level.enemies {
            if !enemy_names.contains(enemy.def_name.as_str()) {
                return Err(unresolved(
                    path,
                    format!(
                        "LevelDef '{}' places unknown EnemyDef '{}'",
                        level.def_name, enemy.def_name
                    ),
                ));
            }
        }
    }

    Ok(DefDatabase::from_defs(
        compiled.enemies.into_iter().map(|(_, def)| def).collect(),
        compiled.areas.into_iter().map(|(_, def)| def).collect(),
        compiled.levels.into_iter().map(|(_, def)| def).collect(),
    ))
}

fn check_unique<'a>(
    entries: impl Iterator<Item = (&'a PathBuf, &'a String)>,
    def_type: &str,
) -> Result<(), ContentCompileError> {
    let mut seen = HashSet::<&str>::new();
    for (path, def_name) in entries {
        if !seen.insert(def_name.as_str()) {
            return Err(ContentCompileError {
                code: ContentErrorCode::DuplicateDef,
                message: format!("duplicate {def_type} '{def_name}'; defName must be unique"),
                file_path: path.clone(),
                location: None,
            });
        }
    }
    Ok(())
}

fn unresolved(path: &Path, message: String) -> ContentCompileError {
    ContentCompileError {
        code: ContentErrorCode::UnresolvedReference,
        message,
        file_path: path.to_path_buf(),
        location: None,
    }
}

struct DocContext<'a, 'input> {
    file_path: &'a Path,
    doc: &'a Document<'input>,
}

impl DocContext<'_, '_> {
    fn error_at(&self, code: ContentErrorCode, message: String, node: Node<'_, '_>) -> ContentCompileError {
        let pos = self.doc.text_pos_at(node.range().start);
        ContentCompileError {
            code,
            message,
            file_path: self.file_path.to_path_buf(),
            location: Some(SourceLocation {
                line: pos.row as usize,
                column: pos.col as usize,
            }),
        }
    }

    fn required_text(&self, node: Node<'_, '_>, field_name: &str) -> Result<String, ContentCompileError> {
        let value = node.text().map(str::trim).unwrap_or_default().to_string();
        if value.is_empty() {
            return Err(self.error_at(
                ContentErrorCode::MissingField,
                format!("field <{field_name}> must not be empty"),
                node,
            ));
        }
        Ok(value)
    }

    fn parse_number(&self, node: Node<'_, '_>, field_name: &str, raw: &str, min: f32, inclusive: bool) -> Result<f32, ContentCompileError> {
        let parsed = raw.trim().parse::<f32>().map_err(|_| {
            self.error_at(
                ContentErrorCode::InvalidValue,
                format!("{field_name} '{raw}' is not a valid number"),
                node,
            )
        })?;
        let in_range = if inclusive { parsed >= min } else { parsed > min };
        if !parsed.is_finite() || !in_range {
            let op = if inclusive { ">=" } else { ">" };
            return Err(self.error_at(
                ContentErrorCode::InvalidValue,
                format!("{field_name} must be finite and {op} {min}"),
                node,
            ));
        }
        Ok(parsed)
    }

    fn number_field(&self, node: Node<'_, '_>, field_name: &str, min: f32, inclusive: bool) -> Result<f32, ContentCompileError> {
        let value = self.required_text(node, field_name)?;
        self.parse_number(node, field_name, &value, min, inclusive)
    }

    fn bool_value(&self, node: Node<'_, '_>, field_name: &str, raw: &str) -> Result<bool, ContentCompileError> {
        match raw.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(self.error_at(
                ContentErrorCode::InvalidValue,
                format!("{field_name} '{other}' must be true or false"),
                node,
            )),
        }
    }

    fn required_attr<'n>(&self, node: Node<'n, '_>, name: &str) -> Result<&'n str, ContentCompileError> {
        node.attribute(name).ok_or_else(|| {
            self.error_at(
                ContentErrorCode::MissingField,
                format!(
                    "missing required attribute '{name}' on <{}>",
                    node.tag_name().name()
                ),
                node,
            )
        })
    }

    fn coordinate_attr(&self, node: Node<'_, '_>, name: &str) -> Result<f32, ContentCompileError> {
        let raw = self.required_attr(node, name)?;
        self.parse_number(node, name, raw, f32::MIN, true)
    }

    fn size_attr(&self, node: Node<'_, '_>, name: &str, default: f32) -> Result<f32, ContentCompileError> {
        match node.attribute(name) {
            Some(raw) => self.parse_number(node, name, raw, 0.0, false),
            None => Ok(default),
        }
    }

    fn bool_attr(&self, node: Node<'_, '_>, name: &str, default: bool) -> Result<bool, ContentCompileError> {
        match node.attribute(name) {
            Some(raw) => self.bool_value(node, name, raw),
            None => Ok(default),
        }
    }

    fn reject_duplicate(&self, seen: &mut HashSet<String>, field: Node<'_, '_>, def_type: &str) -> Result<String, ContentCompileError> {
        let field_name = field.tag_name().name().to_string();
        if !seen.insert(field_name.clone()) {
            return Err(self.error_at(
                ContentErrorCode::DuplicateField,
                format!("duplicate field <{field_name}> in <{def_type}>"),
                field,
            ));
        }
        Ok(field_name)
    }

    fn unknown_field(&self, field: Node<'_, '_>, def_type: &str) -> ContentCompileError {
        self.error_at(
            ContentErrorCode::UnknownField,
            format!(
                "unknown field <{}> in <{def_type}>",
                field.tag_name().name()
            ),
            field,
        )
    }

    fn missing(&self, node: Node<'_, '_>, field_name: &str, def_type: &str) -> ContentCompileError {
        self.error_at(
            ContentErrorCode::MissingField,
            format!("missing required field <{field_name}> in <{def_type}>"),
            node,
        )
    }
}

fn parse_defs_document(
    file_path: &Path,
    raw: &str,
    compiled: &mut CompiledDefs,
) -> Result<(), ContentCompileError> {
    let doc = Document::parse(raw).map_err(|error| ContentCompileError {
        code: ContentErrorCode::XmlMalformed,
        message: format!("malformed XML: {error}"),
        file_path: file_path.to_path_buf(),
        location: Some(SourceLocation {
            line: error.pos().row as usize,
            column: error.pos().col as usize,
        }),
    })?;
    let ctx = DocContext {
        file_path,
        doc: &doc,
    };

    let root = doc.root_element();
    if root.tag_name().name() != "Defs" {
        return Err(ctx.error_at(
            ContentErrorCode::InvalidRoot,
            "root element must be <Defs>".to_string(),
            root,
        ));
    }

    for child in root.children().filter(|node| node.is_element()) {
        match child.tag_name().name() {
            "EnemyDef" => {
                let def = parse_enemy_def(&ctx, child)?;
                compiled.enemies.push((file_path.to_path_buf(), def));
            }
            "AreaDef" => {
                let def = parse_area_def(&ctx, child)?;
                compiled.areas.push((file_path.to_path_buf(), def));
            }
            "LevelDef" => {
                let def = parse_level_def(&ctx, child)?;
                compiled.levels.push((file_path.to_path_buf(), def));
            }
            other => {
                return Err(ctx.error_at(
                    ContentErrorCode::UnknownDefType,
                    format!(
                        "unsupported def type <{other}>; expected <EnemyDef>, <AreaDef> or <LevelDef>"
                    ),
                    child,
                ))
            }
        }
    }

    Ok(())
}

fn parse_enemy_def(ctx: &DocContext<'_, '_>, node: Node<'_, '_>) -> Result<EnemyDef, ContentCompileError> {
    const DEF_TYPE: &str = "EnemyDef";
    let mut seen_fields = HashSet::<String>::new();
    let mut def_name: Option<String> = None;
    let mut race: Option<String> = None;
    let mut tier: Option<String> = None;
    let mut max_health = DEFAULT_ENEMY_MAX_HEALTH;
    let mut speed = DEFAULT_ENEMY_SPEED;
    let mut aggro_radius = DEFAULT_ENEMY_AGGRO_RADIUS;
    let mut attack_range = DEFAULT_ENEMY_ATTACK_RANGE;
    let mut ranged: Option<bool> = None;
    let mut scale = DEFAULT_ENEMY_SCALE;
    let mut frame_width = DEFAULT_ENEMY_FRAME_PX;
    let mut frame_height = DEFAULT_ENEMY_FRAME_PX;

    for field in node.children().filter(|child| child.is_element()) {
        let field_name = ctx.reject_duplicate(&mut seen_fields, field, DEF_TYPE)?;
        match field_name.as_str() {
            "defName" => def_name = Some(ctx.required_text(field, "defName")?),
            "race" => race = Some(ctx.required_text(field, "race")?),
            "tier" => tier = Some(ctx.required_text(field, "tier")?),
            "maxHealth" => max_health = ctx.number_field(field, "maxHealth", 0.0, false)?,
            "speed" => speed = ctx.number_field(field, "speed", 0.0, true)?,
            "aggroRadius" => aggro_radius = ctx.number_field(field, "aggroRadius", 0.0, true)?,
            "attackRange" => attack_range = ctx.number_field(field, "attackRange", 0.0, true)?,
            "ranged" => {
                let value = ctx.required_text(field, "ranged")?;
                ranged = Some(ctx.bool_value(field, "ranged", &value)?);
            }
            "scale" => scale = ctx.number_field(field, "scale", 0.0, false)?,
            "frameWidth" => frame_width = ctx.number_field(field, "frameWidth", 0.0, false)?,
            "frameHeight" => frame_height = ctx.number_field(field, "frameHeight", 0.0, false)?,
            _ => return Err(ctx.unknown_field(field, DEF_TYPE)),
        }
    }

    let Some(def_name) = def_name else {
        return Err(ctx.missing(node, "defName", DEF_TYPE));
    };
    let Some(race) = race else {
        return Err(ctx.missing(node, "race", DEF_TYPE));
    };
    if attack_range > aggro_radius {
        return Err(ctx.error_at(
            ContentErrorCode::InvalidValue,
            format!(
                "attackRange {attack_range} must not exceed aggroRadius {aggro_radius} in EnemyDef '{def_name}'"
            ),
            node,
        ));
    }

    Ok(EnemyDef {
        id: EnemyDefId(0),
        def_name,
        race,
        tier: tier.unwrap_or_else(|| "Normal".to_string()),
        max_health,
        speed,
        aggro_radius,
        attack_range,
        ranged,
        scale,
        frame_size: Vec2::new(frame_width, frame_height),
    })
}

fn parse_area_def(ctx: &DocContext<'_, '_>, node: Node<'_, '_>) -> Result<AreaDef, ContentCompileError> {
    const DEF_TYPE: &str = "AreaDef";
    let mut seen_fields = HashSet::<String>::new();
    let mut def_name: Option<String> = None;
    let mut width: Option<f32> = None;
    let mut height: Option<f32> = None;
    let mut map_scale = DEFAULT_AREA_MAP_SCALE;
    let mut margins = [0.0f32; 4];

    for field in node.children().filter(|child| child.is_element()) {
        let field_name = ctx.reject_duplicate(&mut seen_fields, field, DEF_TYPE)?;
        match field_name.as_str() {
            "defName" => def_name = Some(ctx.required_text(field, "defName")?),
            "width" => width = Some(ctx.number_field(field, "width", 0.0, false)?),
            "height" => height = Some(ctx.number_field(field, "height", 0.0, false)?),
            "mapScale" => map_scale = ctx.number_field(field, "mapScale", 0.0, false)?,
            "marginLeft" => margins[0] = ctx.number_field(field, "marginLeft", 0.0, true)?,
            "marginTop" => margins[1] = ctx.number_field(field, "marginTop", 0.0, true)?,
            "marginRight" => margins[2] = ctx.number_field(field, "marginRight", 0.0, true)?,
            "marginBottom" => margins[3] = ctx.number_field(field, "marginBottom", 0.0, true)?,
            _ => return Err(ctx.unknown_field(field, DEF_TYPE)),
        }
    }

    let Some(def_name) = def_name else {
        return Err(ctx.missing(node, "defName", DEF_TYPE));
    };
    let Some(width) = width else {
        return Err(ctx.missing(node, "width", DEF_TYPE));
    };
    let Some(height) = height else {
        return Err(ctx.missing(node, "height", DEF_TYPE));
    };

    Ok(AreaDef {
        id: AreaDefId(0),
        def_name,
        width,
        height,
        map_scale,
        margin_left: margins[0],
        margin_top: margins[1],
        margin_right: margins[2],
        margin_bottom: margins[3],
    })
}

fn parse_level_def(ctx: &DocContext<'_, '_>, node: Node<'_, '_>) -> Result<LevelDef, ContentCompileError> {
    const DEF_TYPE: &str = "LevelDef";
    let mut seen_fields = HashSet::<String>::new();
    let mut def_name: Option<String> = None;
    let mut area: Option<String> = None;
    let mut hero_start: Option<Vec2> = None;
    let mut props = Vec::new();
    let mut trees = Vec::new();
    let mut enemies = Vec::new();
    let mut triggers = Vec::new();

    for field in node.children().filter(|child| child.is_element()) {
        let field_name = ctx.reject_duplicate(&mut seen_fields, field, DEF_TYPE)?;
        match field_name.as_str() {
            "defName" => def_name = Some(ctx.required_text(field, "defName")?),
            "area" => area = Some(ctx.required_text(field, "area")?),
            "heroStart" => {
                hero_start = Some(Vec2::new(
                    ctx.coordinate_attr(field, "x")?,
                    ctx.coordinate_attr(field, "y")?,
                ));
            }
            "props" => {
                for entry in list_entries(ctx, field, "Prop")? {
                    props.push(parse_prop_placement(ctx, entry)?);
                }
            }
            "trees" => {
                for entry in list_entries(ctx, field, "Tree")? {
                    trees.push(TreePlacement {
                        position: Vec2::new(
                            ctx.coordinate_attr(entry, "x")?,
                            ctx.coordinate_attr(entry, "y")?,
                        ),
                        size: Vec2::new(
                            ctx.size_attr(entry, "width", DEFAULT_TREE_WIDTH_PX)?,
                            ctx.size_attr(entry, "height", DEFAULT_TREE_HEIGHT_PX)?,
                        ),
                        scale: ctx.size_attr(entry, "scale", DEFAULT_TREE_SCALE)?,
                    });
                }
            }
            "enemies" => {
                for entry in list_entries(ctx, field, "Enemy")? {
                    enemies.push(EnemyPlacement {
                        def_name: ctx.required_attr(entry, "def")?.to_string(),
                        position: Vec2::new(
                            ctx.coordinate_attr(entry, "x")?,
                            ctx.coordinate_attr(entry, "y")?,
                        ),
                    });
                }
            }
            "triggers" => {
                for entry in list_entries(ctx, field, "Trigger")? {
                    triggers.push(TriggerPlacement {
                        id: ctx.required_attr(entry, "id")?.to_string(),
                        rect: Rect::new(
                            ctx.coordinate_attr(entry, "x")?,
                            ctx.coordinate_attr(entry, "y")?,
                            ctx.size_attr(entry, "width", DEFAULT_PROP_SIZE_PX)?,
                            ctx.size_attr(entry, "height", DEFAULT_PROP_SIZE_PX)?,
                        ),
                        effect: ctx.required_attr(entry, "effect")?.to_string(),
                        target: ctx.required_attr(entry, "target")?.to_string(),
                        once: ctx.bool_attr(entry, "once", true)?,
                    });
                }
            }
            _ => return Err(ctx.unknown_field(field, DEF_TYPE)),
        }
    }

    let Some(def_name) = def_name else {
        return Err(ctx.missing(node, "defName", DEF_TYPE));
    };
    let Some(area) = area else {
        return Err(ctx.missing(node, "area", DEF_TYPE));
    };
    let Some(hero_start) = hero_start else {
        return Err(ctx.missing(node, "heroStart", DEF_TYPE));
    };

    Ok(LevelDef {
        def_name,
        area,
        hero_start,
        props,
        trees,
        enemies,
        triggers,
    })
}

fn list_entries<'a, 'input>(
    ctx: &DocContext<'_, '_>,
    list: Node<'a, 'input>,
    entry_tag: &str,
) -> Result<Vec<Node<'a, 'input>>, ContentCompileError> {
    let mut entries = Vec::new();
    for entry in list.children().filter(|child| child.is_element()) {
        if entry.tag_name().name() != entry_tag {
            return Err(ctx.error_at(
                ContentErrorCode::UnknownField,
                format!(
                    "unexpected <{}> in <{}>; expected <{entry_tag}>",
                    entry.tag_name().name(),
                    list.tag_name().name()
                ),
                entry,
            ));
        }
        entries.push(entry);
    }
    Ok(entries)
}

fn parse_prop_placement(ctx: &DocContext<'_, '_>, entry: Node<'_, '_>) -> Result<PropPlacement, ContentCompileError> {
    Ok(PropPlacement {
        kind: ctx.required_attr(entry, "kind")?.to_string(),
        position: Vec2::new(
            ctx.coordinate_attr(entry, "x")?,
            ctx.coordinate_attr(entry, "y")?,
        ),
        size: Vec2::new(
            ctx.size_attr(entry, "width", DEFAULT_PROP_SIZE_PX)?,
            ctx.size_attr(entry, "height", DEFAULT_PROP_SIZE_PX)?,
        ),
        scale: ctx.size_attr(entry, "scale", 1.0)?,
        group: entry.attribute("group").map(ToString::to_string),
        spawned: ctx.bool_attr(entry, "spawned", true)?,
        reward: entry.attribute("reward").map(ToString::to_string),
    })
}

struct ReadError {
    path: PathBuf,
    source: std::io::Error,
}

fn collect_xml_files_sorted(root: &Path) -> Result<Vec<PathBuf>, ReadError> {
    let mut files = Vec::<PathBuf>::new();
    collect_recursive(root, &mut files)?;
    files.sort_by_key(|path| normalize_rel_path(path.strip_prefix(root).unwrap_or(path)));
    Ok(files)
}

fn collect_recursive(current: &Path, files: &mut Vec<PathBuf>) -> Result<(), ReadError> {
    let entries = fs::read_dir(current).map_err(|source| ReadError {
        path: current.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| ReadError {
            path: current.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_recursive(&path, files)?;
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        {
            files.push(path);
        }
    }
    Ok(())
}

fn normalize_rel_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn read_error(path: PathBuf, source: std::io::Error) -> ContentCompileError {
    ContentCompileError {
        code: ContentErrorCode::ReadFile,
        message: format!("failed to read content: {source}"),
        file_path: path,
        location: None,
    }
}
