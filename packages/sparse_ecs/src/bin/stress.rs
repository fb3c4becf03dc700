use rayon::iter::ParallelIterator;

use sparse_ecs::{component, Registry};

#[derive(Debug, Clone, Copy, Default)]
pub struct MyComponent(i32);

component!(MyComponent);

fn main() {
    let mut registry = Registry::new();
    let mut to_delete = Vec::new();

    for _ in 0..8 {
        for id in to_delete.drain(..) {
            registry.kill_entity(id);
        }

        for idx in 0..512 {
            let entity_id = registry.create_entity();
            registry.bind::<MyComponent>(entity_id, MyComponent(32)).unwrap();

            if idx % 12 == 11 {
                to_delete.push(entity_id);
            }
        }
    }

    let total: i64 = registry.storage::<MyComponent>()
        .map_or(0, |store| store.par_iter().map(|(_, c)| c.0 as i64).sum());

    println!("registry: {:?}", registry);
    println!("entities: {}, total: {}", registry.entity_count(), total);
}
