//! Tile grid to wall conversion.
//!
//! Every open ("air") cell contributes one unit segment per solid neighbour.
//! Segments that share an endpoint, lie on the same line and face the same way
//! are chained through an endpoint adjacency map and merged, so the wall count
//! follows the outline's complexity rather than the number of tiles.

use std::collections::{HashMap, HashSet};

use crate::error::{LightingError, Result};
use crate::geometry::Point;
use crate::lightbox::LightBox;
use crate::wall::{Direction, FaceAxis, Wall};

/// Grid cell coordinate (column, row)
pub type Cell = (i32, i32);

/// Segment endpoint tagged with the facing of the segment it belongs to.
/// Field order drives the deterministic output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct EndpointKey {
    face_axis: FaceAxis,
    direction: Direction,
    y: i32,
    x: i32,
}

impl EndpointKey {
    fn new(x: i32, y: i32, face_axis: FaceAxis, direction: Direction) -> Self {
        Self {
            face_axis,
            direction,
            y,
            x,
        }
    }
}

/// Unit boundary segment of a single open cell, in pixel coordinates
#[derive(Debug, Clone, Copy)]
struct Segment {
    a: (i32, i32),
    b: (i32, i32),
    face_axis: FaceAxis,
    direction: Direction,
}

/// Merged wall before the trim pass; `p1` is the lower-coordinate end
#[derive(Debug, Clone, Copy)]
struct Run {
    p1: (i32, i32),
    p2: (i32, i32),
    face_axis: FaceAxis,
    direction: Direction,
}

fn raw_segments(open: &HashSet<Cell>, tile_size: i32) -> Vec<Segment> {
    let mut cells: Vec<Cell> = open.iter().copied().collect();
    cells.sort_unstable_by_key(|&(x, y)| (y, x));

    let mut segments = Vec::new();
    for (cx, cy) in cells {
        let left = cx * tile_size;
        let top = cy * tile_size;
        let right = left + tile_size;
        let bottom = top + tile_size;

        if !open.contains(&(cx + 1, cy)) {
            segments.push(Segment {
                a: (right, top),
                b: (right, bottom),
                face_axis: FaceAxis::Horizontal,
                direction: Direction::Inward,
            });
        }
        if !open.contains(&(cx - 1, cy)) {
            segments.push(Segment {
                a: (left, top),
                b: (left, bottom),
                face_axis: FaceAxis::Horizontal,
                direction: Direction::Outward,
            });
        }
        if !open.contains(&(cx, cy + 1)) {
            segments.push(Segment {
                a: (left, bottom),
                b: (right, bottom),
                face_axis: FaceAxis::Vertical,
                direction: Direction::Inward,
            });
        }
        if !open.contains(&(cx, cy - 1)) {
            segments.push(Segment {
                a: (left, top),
                b: (right, top),
                face_axis: FaceAxis::Vertical,
                direction: Direction::Outward,
            });
        }
    }
    segments
}

/// Chain collinear same-facing segments into runs
fn merge_segments(segments: &[Segment]) -> Vec<Run> {
    let mut adjacency: HashMap<EndpointKey, Vec<EndpointKey>> = HashMap::new();
    for seg in segments {
        let a = EndpointKey::new(seg.a.0, seg.a.1, seg.face_axis, seg.direction);
        let b = EndpointKey::new(seg.b.0, seg.b.1, seg.face_axis, seg.direction);
        adjacency.entry(a).or_default().push(b);
        adjacency.entry(b).or_default().push(a);
    }

    let mut termini: Vec<EndpointKey> = adjacency
        .iter()
        .filter(|(_, neighbours)| neighbours.len() == 1)
        .map(|(key, _)| *key)
        .collect();
    termini.sort_unstable();

    let mut visited: HashSet<EndpointKey> = HashSet::with_capacity(adjacency.len());
    let mut runs = Vec::new();

    for start in termini {
        if !visited.insert(start) {
            continue;
        }

        let mut prev: Option<EndpointKey> = None;
        let mut cur = start;
        loop {
            let next = adjacency
                .get(&cur)
                .and_then(|n| n.iter().copied().find(|k| Some(*k) != prev));
            let Some(next) = next else {
                break;
            };
            prev = Some(cur);
            cur = next;
            visited.insert(cur);
            if adjacency.get(&cur).map_or(true, |n| n.len() == 1) {
                break;
            }
        }

        let (p1, p2) = if (start.x, start.y) <= (cur.x, cur.y) {
            ((start.x, start.y), (cur.x, cur.y))
        } else {
            ((cur.x, cur.y), (start.x, start.y))
        };
        runs.push(Run {
            p1,
            p2,
            face_axis: start.face_axis,
            direction: start.direction,
        });
    }
    runs
}

/// Shorten runs by one pixel near open diagonal neighbours and pull
/// positive-facing runs one pixel inward, so adjacent walls do not overlap at
/// concave corners.
fn trim_run(run: &mut Run, open: &HashSet<Cell>, tile_size: i32) {
    let tile_x = run.p1.0.div_euclid(tile_size);
    let tile_y = run.p1.1.div_euclid(tile_size);
    let outward = run.direction == Direction::Outward;

    match run.face_axis {
        FaceAxis::Horizontal => {
            let neighbour = if outward {
                (tile_x, tile_y + 1)
            } else {
                (tile_x - 1, tile_y + 1)
            };
            if open.contains(&neighbour) {
                run.p2.1 -= 1;
            }
            if outward {
                run.p1.0 -= 1;
                run.p2.0 -= 1;
            }
        },
        FaceAxis::Vertical => {
            let neighbour = if outward {
                (tile_x + 1, tile_y)
            } else {
                (tile_x + 1, tile_y - 1)
            };
            if open.contains(&neighbour) {
                run.p2.0 -= 1;
            }
            if outward {
                run.p1.1 -= 1;
                run.p2.1 -= 1;
            }
        },
    }
}

/// Merged boundary walls for a set of open cells
pub fn boundary_walls(open: &HashSet<Cell>, tile_size: u32) -> Result<Vec<Wall>> {
    if tile_size == 0 {
        return Err(LightingError::ZeroTileSize);
    }
    let tile_size = tile_size as i32;

    let segments = raw_segments(open, tile_size);
    let mut runs = merge_segments(&segments);
    for run in &mut runs {
        trim_run(run, open, tile_size);
    }

    log::debug!(
        "generated {} walls from {} boundary segments ({} open cells)",
        runs.len(),
        segments.len(),
        open.len()
    );

    Ok(runs
        .into_iter()
        .map(|run| {
            Wall::new(
                Point::new(run.p1.0 as f32, run.p1.1 as f32),
                Point::new(run.p2.0 as f32, run.p2.1 as f32),
                run.face_axis,
                run.direction,
            )
        })
        .collect())
}

/// Build the boundary walls for `open` and register them with `light_box`.
/// Returns the walls that were added.
pub fn generate_walls(
    light_box: &mut LightBox,
    open: &HashSet<Cell>,
    tile_size: u32,
) -> Result<Vec<Wall>> {
    let walls = boundary_walls(open, tile_size)?;
    light_box.add_walls(walls.iter().copied());
    Ok(walls)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(x0: i32, y0: i32, w: i32, h: i32) -> HashSet<Cell> {
        let mut cells = HashSet::new();
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                cells.insert((x, y));
            }
        }
        cells
    }

    #[test]
    fn test_single_cell_gives_four_unit_segments() {
        let segs = raw_segments(&block(0, 0, 1, 1), 10);
        assert_eq!(segs.len(), 4);
        let runs = merge_segments(&segs);
        assert_eq!(runs.len(), 4);
    }

    #[test]
    fn test_row_merges_into_one_run() {
        let segs = raw_segments(&block(0, 0, 3, 1), 10);
        // 3 tops + 3 bottoms + 2 ends
        assert_eq!(segs.len(), 8);
        let runs = merge_segments(&segs);
        assert_eq!(runs.len(), 4);

        let top = runs
            .iter()
            .find(|r| r.face_axis == FaceAxis::Vertical && r.direction == Direction::Outward)
            .unwrap();
        assert_eq!(top.p1, (0, 0));
        assert_eq!(top.p2, (30, 0));
    }

    #[test]
    fn test_runs_start_at_lower_end() {
        let runs = merge_segments(&raw_segments(&block(2, 1, 1, 4), 10));
        for run in runs {
            assert!(run.p1 <= run.p2);
        }
    }

    #[test]
    fn test_trim_moves_positive_facing_walls_inward() {
        let open = block(0, 0, 1, 1);
        let mut left = Run {
            p1: (0, 0),
            p2: (0, 10),
            face_axis: FaceAxis::Horizontal,
            direction: Direction::Outward,
        };
        trim_run(&mut left, &open, 10);
        assert_eq!(left.p1, (-1, 0));
        assert_eq!(left.p2, (-1, 10));

        let mut right = Run {
            p1: (10, 0),
            p2: (10, 10),
            face_axis: FaceAxis::Horizontal,
            direction: Direction::Inward,
        };
        trim_run(&mut right, &open, 10);
        assert_eq!(right.p1, (10, 0));
        assert_eq!(right.p2, (10, 10));
    }

    #[test]
    fn test_trim_shortens_near_open_diagonal() {
        let open = block(0, 0, 1, 2);
        let mut left = Run {
            p1: (0, 0),
            p2: (0, 20),
            face_axis: FaceAxis::Horizontal,
            direction: Direction::Outward,
        };
        trim_run(&mut left, &open, 10);
        assert_eq!(left.p2, (-1, 19));
    }

    #[test]
    fn test_zero_tile_size_rejected() {
        assert!(matches!(
            boundary_walls(&block(0, 0, 1, 1), 0),
            Err(LightingError::ZeroTileSize)
        ));
    }

    #[test]
    fn test_empty_map_has_no_walls() {
        assert!(boundary_walls(&HashSet::new(), 16).unwrap().is_empty());
    }
}
