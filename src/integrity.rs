// Carve veto for generation passes: refuses to remove a cell when the
// terrain around it is thin in both axes, which would leave a one-cell
// membrane that looks broken and lets projectiles tunnel through "solid"
// ground. Advisory only; craters ignore it on purpose.

use crate::terrain::Terrain;

/// True when clearing `(col, row)` still leaves a contiguous solid run of at
/// least `min_thickness` cells on one horizontal side or one vertical side.
/// Already-empty cells are never carvable.
pub fn can_carve(t: &Terrain, col: i32, row: i32, min_thickness: u32) -> bool {
    if !t.is_solid_cell(col, row) {
        return false;
    }
    let min = min_thickness as i32;
    let run = |dx: i32, dy: i32| -> i32 {
        let mut n = 0;
        while n <= min {
            let k = n + 1;
            if !t.is_solid_cell(col + dx * k, row + dy * k) {
                break;
            }
            n += 1;
        }
        n
    };
    run(1, 0) >= min || run(-1, 0) >= min || run(0, 1) >= min || run(0, -1) >= min
}
