#[derive(Debug, Error)]
pub(crate) enum ContentError {
    #[error("failed to parse world data at {path}: {message}")]
    Parse { path: String, message: String },
    #[error("legend symbol {symbol:?} must be a single character")]
    LegendSymbol { symbol: String },
    #[error("duplicate room at ({x},{y})")]
    DuplicateRoom { x: i8, y: i8 },
    #[error("room ({x},{y}) has {actual} rows, expected {expected}")]
    RowCount {
        x: i8,
        y: i8,
        expected: usize,
        actual: usize,
    },
    #[error("room ({x},{y}) row {row} has {actual} columns, expected {expected}")]
    RowWidth {
        x: i8,
        y: i8,
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("room ({x},{y}) uses unmapped symbol {symbol:?}")]
    UnknownSymbol { x: i8, y: i8, symbol: char },
    #[error("room ({x},{y}) enemy spawn at ({spawn_x},{spawn_y}) is outside the playfield")]
    EnemySpawnBounds {
        x: i8,
        y: i8,
        spawn_x: i32,
        spawn_y: i32,
    },
    #[error("room ({x},{y}) npc dialogue index {line} is out of bounds")]
    NpcDialogueIndex { x: i8, y: i8, line: usize },
    #[error("dialogue line {line} links to missing line {next}")]
    DialogueLink { line: usize, next: usize },
    #[error("start room ({x},{y}) is not defined")]
    MissingStartRoom { x: i8, y: i8 },
}

#[derive(Debug, Deserialize)]
struct WorldDoc {
    start_room: RoomCoord,
    start_pos: PositionDoc,
    legend: HashMap<String, u8>,
    tile_classes: TileClassesDoc,
    rooms: Vec<RoomDoc>,
    #[serde(default)]
    dialogue: Vec<DialogueLineDoc>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct PositionDoc {
    x: i32,
    y: i32,
}

#[derive(Debug, Default, Deserialize)]
struct TileClassesDoc {
    #[serde(default)]
    solid: Vec<u8>,
    #[serde(default)]
    hazard: Vec<u8>,
    #[serde(default)]
    bench: Vec<u8>,
    #[serde(default)]
    npc: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct RoomDoc {
    x: i8,
    y: i8,
    rows: Vec<String>,
    #[serde(default)]
    enemies: Vec<EnemySpawnDoc>,
    #[serde(default)]
    npc_dialogue: Option<usize>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct EnemySpawnDoc {
    x: i32,
    y: i32,
    facing: FacingDoc,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum FacingDoc {
    Left,
    Right,
}

#[derive(Debug, Deserialize)]
struct DialogueLineDoc {
    text: String,
    next: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DialogueLine {
    text: String,
    next: Option<usize>,
}

/// Immutable startup data: the room graph, the tile class table and the
/// dialogue table. Loaded once; the core never mutates it.
#[derive(Debug)]
pub(crate) struct GameContent {
    class_table: ClassTable,
    rooms: RoomGraph,
    start_room: RoomCoord,
    start_x: i32,
    start_y: i32,
    dialogue: Vec<DialogueLine>,
}

impl GameContent {
    fn load_embedded() -> Result<Self, ContentError> {
        Self::parse(include_str!("data/world.json"))
    }

    fn parse(source: &str) -> Result<Self, ContentError> {
        let mut deserializer = serde_json::Deserializer::from_str(source);
        let doc: WorldDoc =
            serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
                ContentError::Parse {
                    path: error.path().to_string(),
                    message: error.inner().to_string(),
                }
            })?;
        Self::build(doc)
    }

    fn build(doc: WorldDoc) -> Result<Self, ContentError> {
        let mut legend = HashMap::new();
        for (symbol, tile) in &doc.legend {
            let mut chars = symbol.chars();
            let (Some(first), None) = (chars.next(), chars.next()) else {
                return Err(ContentError::LegendSymbol {
                    symbol: symbol.clone(),
                });
            };
            legend.insert(first, *tile);
        }

        let mut class_table = ClassTable::default();
        for (tiles, class) in [
            (&doc.tile_classes.solid, TileClass::Solid),
            (&doc.tile_classes.hazard, TileClass::Hazard),
            (&doc.tile_classes.bench, TileClass::Bench),
            (&doc.tile_classes.npc, TileClass::Npc),
        ] {
            for tile in tiles {
                class_table.set(*tile, class);
            }
        }

        let mut rooms = RoomGraph::default();
        for room_doc in &doc.rooms {
            let coord = RoomCoord {
                x: room_doc.x,
                y: room_doc.y,
            };
            let room = build_room(room_doc, &legend, doc.dialogue.len())?;
            if rooms.rooms.insert(coord, room).is_some() {
                return Err(ContentError::DuplicateRoom {
                    x: coord.x,
                    y: coord.y,
                });
            }
        }

        if rooms.room(doc.start_room).is_none() {
            return Err(ContentError::MissingStartRoom {
                x: doc.start_room.x,
                y: doc.start_room.y,
            });
        }

        for (line, entry) in doc.dialogue.iter().enumerate() {
            if let Some(next) = entry.next {
                if next >= doc.dialogue.len() {
                    return Err(ContentError::DialogueLink { line, next });
                }
            }
        }

        Ok(Self {
            class_table,
            rooms,
            start_room: doc.start_room,
            start_x: doc.start_pos.x,
            start_y: doc.start_pos.y,
            dialogue: doc
                .dialogue
                .into_iter()
                .map(|line| DialogueLine {
                    text: line.text,
                    next: line.next,
                })
                .collect(),
        })
    }

    fn view_of(&self, coord: RoomCoord) -> Option<RoomView<'_>> {
        self.rooms.room(coord).map(|room| RoomView {
            room,
            classes: &self.class_table,
        })
    }
}

fn build_room(
    doc: &RoomDoc,
    legend: &HashMap<char, u8>,
    dialogue_len: usize,
) -> Result<Room, ContentError> {
    if doc.rows.len() != ROOM_ROWS as usize {
        return Err(ContentError::RowCount {
            x: doc.x,
            y: doc.y,
            expected: ROOM_ROWS as usize,
            actual: doc.rows.len(),
        });
    }

    let mut tiles = Vec::with_capacity(ROOM_TILE_COUNT);
    for (row_index, row) in doc.rows.iter().enumerate() {
        let symbols: Vec<char> = row.chars().collect();
        if symbols.len() != ROOM_COLS as usize {
            return Err(ContentError::RowWidth {
                x: doc.x,
                y: doc.y,
                row: row_index,
                expected: ROOM_COLS as usize,
                actual: symbols.len(),
            });
        }
        for symbol in symbols {
            let tile = legend
                .get(&symbol)
                .copied()
                .ok_or(ContentError::UnknownSymbol {
                    x: doc.x,
                    y: doc.y,
                    symbol,
                })?;
            tiles.push(tile);
        }
    }

    let mut spawns = Vec::with_capacity(doc.enemies.len());
    for enemy in &doc.enemies {
        let in_bounds = enemy.x >= 0
            && enemy.x + ENEMY_SPRITE_SIZE <= ROOM_PIXEL_WIDTH
            && enemy.y >= 0
            && enemy.y + ENEMY_SPRITE_SIZE <= PLAYFIELD_BOTTOM;
        if !in_bounds {
            return Err(ContentError::EnemySpawnBounds {
                x: doc.x,
                y: doc.y,
                spawn_x: enemy.x,
                spawn_y: enemy.y,
            });
        }
        spawns.push(EnemySpawn {
            x: enemy.x,
            y: enemy.y,
            facing: match enemy.facing {
                FacingDoc::Left => Facing::Left,
                FacingDoc::Right => Facing::Right,
            },
        });
    }

    if let Some(line) = doc.npc_dialogue {
        if line >= dialogue_len {
            return Err(ContentError::NpcDialogueIndex {
                x: doc.x,
                y: doc.y,
                line,
            });
        }
    }

    Ok(Room {
        tiles,
        spawns,
        npc_dialogue: doc.npc_dialogue,
    })
}
