//! Random starting populations

use rand::Rng;
use skirmish_logic::{FieldBounds, NpcKind};

use super::NpcFactory;
use crate::population::Population;

/// Scatter `count` NPCs of uniformly random kind over the field.
pub fn generate_population(
    factory: &NpcFactory,
    count: usize,
    bounds: FieldBounds,
    rng: &mut impl Rng,
) -> Population {
    let mut population = Population::new();
    for _ in 0..count {
        let kind = NpcKind::ALL[rng.gen_range(0..NpcKind::ALL.len())];
        let x = rng.gen_range(0..bounds.width);
        let y = rng.gen_range(0..bounds.height);
        population.insert(factory.create(kind, x, y));
    }
    population
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::TextObserver;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    #[test]
    fn test_generated_population_fits_field() {
        let factory = NpcFactory::new(Arc::new(TextObserver::detached()));
        let bounds = FieldBounds::new(40, 25);
        let mut rng = StdRng::seed_from_u64(7);
        let population = generate_population(&factory, 200, bounds, &mut rng);

        assert_eq!(population.len(), 200);
        assert!(population.iter().all(|n| bounds.contains(n.position())));
        assert!(population.iter().all(|n| n.is_alive()));
        let counts = population.counts();
        // 200 draws over three kinds; every kind shows up.
        for kind in NpcKind::ALL {
            assert!(counts.of_kind(kind) > 0, "no {kind} generated");
        }
    }
}
