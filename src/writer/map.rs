use crate::projector::GRID_SIZE;
use crate::schema::StarSystem;

/// Render the galaxy grid as text.
///
/// `X` marks Sol, `*` any other system, `.` an empty cell within
/// `radius_ly` of Sol and a space an empty cell beyond it. Rows run from
/// `grid_y = 0` downwards, one line per row.
pub fn render_star_map(systems: &[StarSystem], radius_ly: f64, scale: f64) -> String {
    let size = GRID_SIZE as usize;
    let mut grid = vec![vec!['.'; size]; size];

    let (sol_x, sol_y) = systems
        .iter()
        .find(|s| s.is_home())
        .map(|s| (s.grid_x as i64, s.grid_y as i64))
        .unwrap_or((size as i64 / 2, size as i64 / 2));

    for system in systems {
        let cell = &mut grid[system.grid_y as usize][system.grid_x as usize];
        if system.is_home() {
            *cell = 'X';
        } else if *cell == '.' {
            *cell = '*';
        }
    }

    for (gy, row) in grid.iter_mut().enumerate() {
        for (gx, cell) in row.iter_mut().enumerate() {
            if *cell != '.' {
                continue;
            }
            let dx = gx as i64 - sol_x;
            let dy = gy as i64 - sol_y;
            let dist_ly = ((dx * dx + dy * dy) as f64).sqrt() * scale;
            if dist_ly > radius_ly {
                *cell = ' ';
            }
        }
    }

    let mut out = String::with_capacity(size * (size + 1));
    for row in grid {
        out.extend(row);
        out.push('\n');
    }
    out
}
