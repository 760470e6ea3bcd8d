//! Positions on the 50x50 per-system map

use crate::keyed::jitter;

pub const LOCAL_MAP_SIZE: u8 = 50;
/// The star sits at (25, 25)
pub const LOCAL_CENTER: i32 = LOCAL_MAP_SIZE as i32 / 2;
/// Orbit radius in tiles for each primary slot; extra primaries share the last
pub const ORBIT_RADII: [i32; 6] = [5, 8, 11, 14, 17, 20];

fn clamp_local(v: i32) -> u8 {
    v.clamp(0, LOCAL_MAP_SIZE as i32 - 1) as u8
}

pub fn orbit_radius(primary_index: usize) -> i32 {
    ORBIT_RADII[primary_index.min(ORBIT_RADII.len() - 1)]
}

/// Map cells whose distance from the star rounds to `radius`, in row-major
/// order. `round(sqrt(d2)) == r` is `r*r - r + 1 <= d2 <= r*r + r` for
/// integer `d2`.
pub fn ring_cells(radius: i32) -> Vec<(u8, u8)> {
    let lo = radius * radius - radius + 1;
    let hi = radius * radius + radius;

    let mut cells = Vec::new();
    for y in 0..LOCAL_MAP_SIZE as i32 {
        for x in 0..LOCAL_MAP_SIZE as i32 {
            let dx = x - LOCAL_CENTER;
            let dy = y - LOCAL_CENTER;
            let d2 = dx * dx + dy * dy;
            if (lo..=hi).contains(&d2) {
                cells.push((x as u8, y as u8));
            }
        }
    }
    cells
}

/// Position of a primary: a keyed pick among the cells of its orbit ring
pub fn primary_position(system_id: u32, primary_index: usize) -> (u8, u8) {
    let cells = ring_cells(orbit_radius(primary_index));
    if cells.is_empty() {
        return (LOCAL_CENTER as u8, LOCAL_CENTER as u8);
    }
    let key = format!("orbit:{}:{}", system_id, primary_index);
    let pick = jitter(&key, 0, cells.len() as i32 - 1) as usize;
    cells[pick]
}

/// Position of a moon: its parent's cell nudged by -1..=2 tiles per axis
pub fn moon_position(system_id: u32, object_id: u32, parent: (u8, u8)) -> (u8, u8) {
    let dx = jitter(&format!("moonpos:{}:{}:x", system_id, object_id), -1, 2);
    let dy = jitter(&format!("moonpos:{}:{}:y", system_id, object_id), -1, 2);
    (
        clamp_local(parent.0 as i32 + dx),
        clamp_local(parent.1 as i32 + dy),
    )
}
