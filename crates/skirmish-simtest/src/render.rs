//! ASCII rendering of the field.

use std::fmt::Write;

use skirmish_core::population::Population;
use skirmish_core::FieldBounds;

const EMPTY: char = ' ';
const DEAD: char = '.';

/// Draw one frame: a row per y, a `[c]` cell per x. Dead NPCs show as `.`,
/// NPCs outside the field are not drawn. Later NPCs overwrite earlier ones.
pub fn render_field(population: &Population, bounds: FieldBounds) -> String {
    let width = bounds.width.max(0) as usize;
    let height = bounds.height.max(0) as usize;
    let mut cells = vec![vec![EMPTY; width]; height];

    for npc in population.iter() {
        let pos = npc.position();
        if !bounds.contains(pos) {
            continue;
        }
        cells[pos.y as usize][pos.x as usize] = if npc.is_alive() {
            npc.kind().glyph()
        } else {
            DEAD
        };
    }

    let mut frame = String::with_capacity(height * (width * 4 + 1));
    for row in &cells {
        for cell in row {
            let _ = write!(frame, "[{cell}] ");
        }
        frame.push('\n');
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::npc::Npc;
    use skirmish_core::NpcKind;
    use std::sync::Arc;

    #[test]
    fn test_cells_show_kind_dead_and_empty() {
        let mut population = Population::new();
        population.insert(Arc::new(Npc::new(NpcKind::Druid, 0, 0)));
        population.insert(Arc::new(Npc::new(NpcKind::Orc, 2, 0)));
        let slaver = Arc::new(Npc::new(NpcKind::Slaver, 1, 1));
        slaver.must_die();
        population.insert(slaver);
        population.insert(Arc::new(Npc::new(NpcKind::Orc, 7, 7)));

        let frame = render_field(&population, FieldBounds::new(3, 2));
        assert_eq!(frame, "[D] [ ] [O] \n[ ] [.] [ ] \n");
    }
}
