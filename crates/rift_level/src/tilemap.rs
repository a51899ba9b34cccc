//! Tile map: visible tiles, the solid-tile collision grid derived from them,
//! special trigger tiles, and named object layers used to spawn entities.
//!
//! Maps are authored as JSON. Every placed tile is drawn; tiles whose id is
//! registered in `special_tiles` become triggers instead of solids.
//!
//! Collision uses **axis-separable move-and-slide**: X movement is resolved
//! against the grid (and any extra solid rects such as moving walls) first,
//! then Y using the corrected X. World coordinates grow downward.

use glam::Vec2;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use rift_core::geom::Rect;
use rift_render::DrawList;

use crate::special_tiles::{SpecialTileGroup, SpecialTileKind};

#[derive(Debug, Deserialize, Clone)]
pub struct TileMapFile {
    pub version: String,
    pub map_id: String,
    pub tile_size: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub spawn: Option<[f32; 2]>,
    pub tiles: Vec<TilePlacement>,
    /// Tile id (as a string key) to trigger kind.
    #[serde(default)]
    pub special_tiles: HashMap<String, SpecialTileKind>,
    #[serde(default)]
    pub layers: Vec<ObjectLayer>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TilePlacement {
    pub x: i32,
    pub y: i32,
    pub id: u32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObjectLayer {
    pub name: String,
    #[serde(default)]
    pub objects: Vec<MapObject>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MapObject {
    #[serde(default)]
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl MapObject {
    pub fn new(name: &str, rect: Rect) -> Self {
        Self {
            name: name.to_string(),
            x: rect.x,
            y: rect.y,
            width: rect.w,
            height: rect.h,
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionMoveResult {
    pub rect: Rect,
    pub collided_y: bool,
    pub blocked_left: bool,
    pub blocked_right: bool,
    pub blocked_down: bool,
    pub blocked_up: bool,
}

/// Tiles baked for one tile-set, ready to blit.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSurface {
    pub tileset: String,
    pub tiles: Vec<TilePlacement>,
    pub size: Vec2,
}

impl MapSurface {
    pub fn draw(&self, surface: &mut DrawList, origin: Vec2) {
        surface.push(rift_render::DrawCommand::Tiles {
            tileset: self.tileset.clone(),
            origin,
            tile_count: self.tiles.len(),
        });
    }
}

#[derive(Debug, Clone)]
pub struct TileLayerMap {
    pub map_id: String,
    pub tile_size: i32,
    pub width: i32,
    pub height: i32,
    spawn: Option<Vec2>,
    tiles: Vec<TilePlacement>,
    solids: HashSet<GridCell>,
    pub special_tiles: HashMap<u32, SpecialTileGroup>,
    layers: HashMap<String, Vec<MapObject>>,
}

impl TileLayerMap {
    pub fn from_file(file: TileMapFile) -> Result<Self, String> {
        let special_kinds = validate_map_file(&file)?;
        let tile_size = file.tile_size;

        let mut tiles = file.tiles;
        tiles.sort_by_key(|t| (t.y, t.x));

        let mut solids = HashSet::new();
        let mut special_tiles: HashMap<u32, SpecialTileGroup> = HashMap::new();
        for tile in &tiles {
            match special_kinds.get(&tile.id) {
                Some(&kind) => {
                    let rect = Rect::new(
                        (tile.x * tile_size) as f32,
                        (tile.y * tile_size) as f32,
                        tile_size as f32,
                        tile_size as f32,
                    );
                    special_tiles
                        .entry(tile.id)
                        .or_insert_with(|| SpecialTileGroup::new(tile.id, kind))
                        .add_tile(rect);
                }
                None => {
                    solids.insert(GridCell {
                        x: tile.x,
                        y: tile.y,
                    });
                }
            }
        }

        let layers = file
            .layers
            .into_iter()
            .map(|layer| (layer.name, layer.objects))
            .collect();

        Ok(Self {
            map_id: file.map_id,
            tile_size,
            width: file.width,
            height: file.height,
            spawn: file.spawn.map(Vec2::from),
            tiles,
            solids,
            special_tiles,
            layers,
        })
    }

    /// Objects of a named layer. A missing layer is a content error.
    pub fn layer(&self, name: &str) -> Result<&[MapObject], String> {
        self.layers
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| format!("Map '{}' has no object layer named '{}'", self.map_id, name))
    }

    /// Where the player starts when no checkpoint has been saved yet.
    pub fn spawn_point(&self) -> Vec2 {
        self.spawn.unwrap_or_else(|| {
            let ts = self.tile_size as f32;
            Vec2::new(ts * 2.0, ts * 2.0)
        })
    }

    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            (self.width * self.tile_size) as f32,
            (self.height * self.tile_size) as f32,
        )
    }

    /// Bake every visible tile against `tileset`.
    pub fn make_map(&self, tileset: &str) -> MapSurface {
        MapSurface {
            tileset: tileset.to_string(),
            tiles: self.tiles.clone(),
            size: self.pixel_size(),
        }
    }

    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return false;
        }
        self.solids.contains(&GridCell { x, y })
    }

    pub fn rect_hits_solid(&self, rect: Rect) -> bool {
        const EPS: f32 = 0.001;
        let x0 = self.world_to_cell(rect.left() + EPS);
        let x1 = self.world_to_cell(rect.right() - EPS);
        let y0 = self.world_to_cell(rect.top() + EPS);
        let y1 = self.world_to_cell(rect.bottom() - EPS);
        (y0..=y1).any(|y| (x0..=x1).any(|x| self.is_solid(x, y)))
    }

    /// Move `rect` by (`dx`, `dy`), stopping at solid tiles and `obstacles`.
    pub fn move_and_collide(
        &self,
        rect: Rect,
        dx: f32,
        dy: f32,
        obstacles: &[Rect],
    ) -> CollisionMoveResult {
        const EPS: f32 = 0.0001;

        let resolved_x = self.resolve_axis_x(rect, dx, obstacles);
        let collided_x = (resolved_x - (rect.x + dx)).abs() > EPS;

        let mut moved = rect;
        moved.x = resolved_x;
        let resolved_y = self.resolve_axis_y(moved, dy, obstacles);
        let collided_y = (resolved_y - (rect.y + dy)).abs() > EPS;
        moved.y = resolved_y;

        CollisionMoveResult {
            rect: moved,
            collided_y,
            blocked_left: collided_x && dx < 0.0,
            blocked_right: collided_x && dx > 0.0,
            blocked_down: collided_y && dy > 0.0,
            blocked_up: collided_y && dy < 0.0,
        }
    }

    fn resolve_axis_x(&self, rect: Rect, dx: f32, obstacles: &[Rect]) -> f32 {
        if dx == 0.0 {
            return rect.x;
        }

        const EPS: f32 = 0.001;
        let mut candidate_x = rect.x + dx;
        let y0 = self.world_to_cell(rect.top() + EPS);
        let y1 = self.world_to_cell(rect.bottom() - EPS);
        let shares_rows = |ob: &Rect| rect.top() < ob.bottom() && ob.top() < rect.bottom();

        if dx > 0.0 {
            let x_cell = self.world_to_cell(candidate_x + rect.w - EPS);
            for y in y0..=y1 {
                if self.is_solid(x_cell, y) {
                    candidate_x = candidate_x.min(self.cell_min(x_cell) - rect.w);
                }
            }
            for ob in obstacles.iter().filter(|ob| shares_rows(ob)) {
                if rect.right() <= ob.left() + EPS && candidate_x + rect.w > ob.left() {
                    candidate_x = candidate_x.min(ob.left() - rect.w);
                }
            }
            candidate_x = candidate_x.max(rect.x);
        } else {
            let x_cell = self.world_to_cell(candidate_x + EPS);
            for y in y0..=y1 {
                if self.is_solid(x_cell, y) {
                    candidate_x = candidate_x.max(self.cell_max(x_cell));
                }
            }
            for ob in obstacles.iter().filter(|ob| shares_rows(ob)) {
                if rect.left() >= ob.right() - EPS && candidate_x < ob.right() {
                    candidate_x = candidate_x.max(ob.right());
                }
            }
            candidate_x = candidate_x.min(rect.x);
        }

        candidate_x
    }

    fn resolve_axis_y(&self, rect: Rect, dy: f32, obstacles: &[Rect]) -> f32 {
        if dy == 0.0 {
            return rect.y;
        }

        const EPS: f32 = 0.001;
        let mut candidate_y = rect.y + dy;
        let x0 = self.world_to_cell(rect.left() + EPS);
        let x1 = self.world_to_cell(rect.right() - EPS);
        let shares_columns = |ob: &Rect| rect.left() < ob.right() && ob.left() < rect.right();

        if dy > 0.0 {
            let y_cell = self.world_to_cell(candidate_y + rect.h - EPS);
            for x in x0..=x1 {
                if self.is_solid(x, y_cell) {
                    candidate_y = candidate_y.min(self.cell_min(y_cell) - rect.h);
                }
            }
            for ob in obstacles.iter().filter(|ob| shares_columns(ob)) {
                if rect.bottom() <= ob.top() + EPS && candidate_y + rect.h > ob.top() {
                    candidate_y = candidate_y.min(ob.top() - rect.h);
                }
            }
            candidate_y = candidate_y.max(rect.y);
        } else {
            let y_cell = self.world_to_cell(candidate_y + EPS);
            for x in x0..=x1 {
                if self.is_solid(x, y_cell) {
                    candidate_y = candidate_y.max(self.cell_max(y_cell));
                }
            }
            for ob in obstacles.iter().filter(|ob| shares_columns(ob)) {
                if rect.top() >= ob.bottom() - EPS && candidate_y < ob.bottom() {
                    candidate_y = candidate_y.max(ob.bottom());
                }
            }
            candidate_y = candidate_y.min(rect.y);
        }

        candidate_y
    }

    fn world_to_cell(&self, world: f32) -> i32 {
        (world / self.tile_size as f32).floor() as i32
    }

    /// World coordinate of a cell's left (or top) edge.
    fn cell_min(&self, cell: i32) -> f32 {
        (cell * self.tile_size) as f32
    }

    /// World coordinate of a cell's right (or bottom) edge.
    fn cell_max(&self, cell: i32) -> f32 {
        ((cell + 1) * self.tile_size) as f32
    }
}

pub fn load_tilemap_from_path(path: &Path) -> Result<TileLayerMap, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read map {}: {e}", path.display()))?;
    let file: TileMapFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse map JSON {}: {e}", path.display()))?;
    let map = TileLayerMap::from_file(file)?;
    log::info!(
        "Loaded map '{}' ({}x{} tiles, {} object layers)",
        map.map_id,
        map.width,
        map.height,
        map.layers.len()
    );
    Ok(map)
}

fn validate_map_file(file: &TileMapFile) -> Result<HashMap<u32, SpecialTileKind>, String> {
    if file.version != "0.1" {
        return Err(format!(
            "Map validation failed: unsupported version '{}'",
            file.version
        ));
    }
    if file.tile_size <= 0 {
        return Err("Map validation failed: tile_size must be > 0".to_string());
    }
    if file.width <= 0 || file.height <= 0 {
        return Err("Map validation failed: width and height must be > 0".to_string());
    }

    let mut special_kinds = HashMap::new();
    for (key, kind) in &file.special_tiles {
        let id: u32 = key.parse().map_err(|_| {
            format!(
                "Map validation failed: special tile key '{}' is not a tile id",
                key
            )
        })?;
        special_kinds.insert(id, *kind);
    }

    let mut seen = HashSet::new();
    for tile in &file.tiles {
        if tile.x < 0 || tile.x >= file.width || tile.y < 0 || tile.y >= file.height {
            return Err(format!(
                "Map validation failed: tile out of bounds ({}, {})",
                tile.x, tile.y
            ));
        }
        if !seen.insert(GridCell {
            x: tile.x,
            y: tile.y,
        }) {
            return Err(format!(
                "Map validation failed: duplicate tile at ({}, {})",
                tile.x, tile.y
            ));
        }
    }

    let mut layer_names = HashSet::new();
    for layer in &file.layers {
        if !layer_names.insert(layer.name.as_str()) {
            return Err(format!(
                "Map validation failed: duplicate object layer '{}'",
                layer.name
            ));
        }
        if layer.objects.is_empty() {
            log::warn!(
                "Map '{}' layer '{}' has no objects. This is allowed but often accidental.",
                file.map_id,
                layer.name
            );
        }
        for object in &layer.objects {
            if object.width < 0.0 || object.height < 0.0 {
                return Err(format!(
                    "Map validation failed: object '{}' in layer '{}' has a negative size",
                    object.name, layer.name
                ));
            }
        }
    }

    Ok(special_kinds)
}
