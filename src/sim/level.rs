//! Level layouts and the arena builder
//!
//! Each level is an ASCII map, one character per 16-unit tile:
//!
//! | char | tile                         |
//! |------|------------------------------|
//! | `.`  | floor                        |
//! | `#`  | wall                         |
//! | `%`  | breakable wall               |
//! | `=`  | sandbag                      |
//! | `^`  | spikes                       |
//! | `~`  | vision blocker (tall grass)  |
//! | `@`  | player spawn                 |
//! | `p`  | Peon                         |
//! | `h`  | Heavy                        |
//! | `m`  | Harbinger                    |
//! | `s`  | Spiked scout                 |
//! | `w`  | Warden                       |

use glam::IVec2;

use super::monster::{Monster, MonsterKind};
use super::player::Player;
use super::scenery::StaticElement;
use super::state::Arena;
use crate::consts::TILE_SIZE;
use crate::error::{GameError, Result};
use crate::save::{Difficulty, MAX_LEVEL};

pub const PLAYER_SPEED: i32 = 2;
pub const BREAKABLE_WALL_HP: i32 = 30;
pub const SPIKE_DAMAGE: i32 = 5;

const LEVEL_1: &str = "\
##############################
#............................#
#..@.........................#
#............................#
#.......====.................#
#....................p.......#
#............................#
#...........~~~~.............#
#...........~~~~......p......#
#............................#
#.......p....................#
#............................#
#............................#
##############################";

const LEVEL_2: &str = "\
##############################
#............................#
#..@.......#.................#
#..........#..........p......#
#..........#.................#
#..........%%%%..............#
#............................#
#.....====...........h.......#
#............................#
#..............^^^...........#
#......p.......^^^.......p...#
#............................#
#............................#
##############################";

const LEVEL_3: &str = "\
##############################
#............................#
#..@.....~~~~................#
#........~~~~........m.......#
#............................#
#####%%%%######..........=====
#............................#
#.......s....................#
#....................s.......#
#.........====...............#
#............................#
#.....p...........h..........#
#............................#
##############################";

const LEVEL_4: &str = "\
################################
#..............................#
#..@...........#...............#
#..............#.......m.......#
#..............#...............#
#...====.......%...............#
#..............%.......h.......#
#..............#...............#
#.......^^^....#...............#
#..............#......s........#
#..s...........#...............#
#..............................#
#........m.....................#
################################";

const LEVEL_5: &str = "\
################################
#..............................#
#..@.....~~~~~~~...............#
#........~~~~~~~.......h.......#
#..............................#
#...%%%%%%%%...........====....#
#..............................#
#.....^^^.........m............#
#..............................#
#..h.......................s...#
#.............=====............#
#.........s..............m.....#
#..............................#
################################";

const LEVEL_6: &str = "\
##################################
#................................#
#..@.............................#
#................................#
#.....====..............%%%%.....#
#................................#
#.........~~~~....m..............#
#.........~~~~...................#
#..................w.............#
#................................#
#.....^^^^...................h...#
#................................#
#...m.....................s......#
#................................#
##################################";

/// Raw map for `level`, if it exists
pub fn layout(level: u32) -> Option<&'static str> {
    match level {
        1 => Some(LEVEL_1),
        2 => Some(LEVEL_2),
        3 => Some(LEVEL_3),
        4 => Some(LEVEL_4),
        5 => Some(LEVEL_5),
        6 => Some(LEVEL_6),
        _ => None,
    }
}

/// Build the arena for a campaign level
pub fn build_arena(level: u32, difficulty: Difficulty, seed: u64) -> Result<Arena> {
    if !(1..=MAX_LEVEL).contains(&level) {
        return Err(GameError::UnknownLevel(level));
    }
    let map = layout(level).ok_or(GameError::UnknownLevel(level))?;
    let arena = parse_layout(level, map, difficulty, seed)?;
    log::info!(
        "Built level {} ({}): {} monsters, {} static elements",
        level,
        difficulty.as_str(),
        arena.monsters.len(),
        arena.elements.len()
    );
    Ok(arena)
}

/// Turn an ASCII map into an arena. `level` is only used in errors.
pub fn parse_layout(level: u32, map: &str, difficulty: Difficulty, seed: u64) -> Result<Arena> {
    let invalid = |reason: String| GameError::InvalidMap { level, reason };

    let rows: Vec<&str> = map.lines().filter(|l| !l.trim().is_empty()).collect();
    let width = rows.first().map_or(0, |r| r.chars().count());
    if width == 0 {
        return Err(invalid("empty map".to_string()));
    }
    if let Some(row) = rows.iter().position(|r| r.chars().count() != width) {
        return Err(invalid(format!("row {row} is not {width} tiles wide")));
    }

    let size = IVec2::new(width as i32, rows.len() as i32) * TILE_SIZE;
    let mut arena = Arena::with_size(seed, size);
    let scale = difficulty.monster_scale();

    for (y, row) in rows.iter().enumerate() {
        for (x, tile) in row.chars().enumerate() {
            let pos = IVec2::new(x as i32, y as i32) * TILE_SIZE;
            match tile {
                '.' => {}
                '#' => arena.add_element(StaticElement::wall(pos)),
                '%' => arena.add_element(StaticElement::breakable_wall(pos, BREAKABLE_WALL_HP)),
                '=' => arena.add_element(StaticElement::sandbag(pos)),
                '^' => arena.add_element(StaticElement::spike(pos, SPIKE_DAMAGE)),
                '~' => arena.add_element(StaticElement::vision_blocker(pos)),
                '@' => {
                    if arena.player.is_some() {
                        return Err(invalid(format!("second player spawn at {x},{y}")));
                    }
                    arena.set_player(Player::new(pos, difficulty.player_hp(), PLAYER_SPEED));
                }
                _ => match monster_kind(tile) {
                    Some(kind) => arena.add_monster(spawn_scaled(kind, pos, scale)),
                    None => return Err(invalid(format!("unknown tile {tile:?} at {x},{y}"))),
                },
            }
        }
    }

    if arena.player.is_none() {
        return Err(invalid("no player spawn".to_string()));
    }
    Ok(arena)
}

fn monster_kind(tile: char) -> Option<MonsterKind> {
    match tile {
        'p' => Some(MonsterKind::Peon),
        'h' => Some(MonsterKind::Heavy),
        'm' => Some(MonsterKind::Harbinger),
        's' => Some(MonsterKind::SpikedScout),
        'w' => Some(MonsterKind::Warden),
        _ => None,
    }
}

fn spawn_scaled(kind: MonsterKind, pos: IVec2, scale: f64) -> Monster {
    let stats = kind.stats();
    let hp = scaled(stats.hp, scale);
    let damage = scaled(stats.player_damage, scale);
    if kind.can_shoot() {
        Monster::harbinger(
            pos,
            hp,
            stats.speed,
            damage,
            stats.vision_range,
            stats.shooting_range,
        )
    } else {
        Monster::new(kind, pos, hp, stats.speed, damage, stats.vision_range)
    }
}

fn scaled(value: i32, scale: f64) -> i32 {
    (value as f64 * scale).round() as i32
}
