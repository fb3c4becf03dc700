use std::collections::HashMap;
use std::io::Write;

use rayon::prelude::*;

use sparse_ecs::{component, EntityID, Registry};

const G: f32 = 10.0;
const TIME_STEP: f32 = 1.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct Position(f32, f32);

#[derive(Debug, Clone, Copy, Default)]
pub struct Velocity(f32, f32);

#[derive(Debug, Clone, Copy, Default)]
pub struct Mass(f32);

component!(Position, Velocity, Mass);

/// Compute the new velocity of every body, returning the bodies which
/// collided alongside.
fn apply_acceleration(registry: &mut Registry) -> Vec<EntityID> {
    let updates: Vec<(EntityID, Option<Velocity>)> = {
        let bodies = registry.query::<(Position, Mass), ()>();

        bodies.par_iter()
            .map(|&(id_a, (&Position(x_a, y_a), &Mass(m_a)))| {
                let mut vx_a = 0f32;
                let mut vy_a = 0f32;

                for &(id_b, (&Position(x_b, y_b), &Mass(m_b))) in bodies.iter() {
                    if id_b == id_a || m_b < 0.00001 {
                        continue;
                    }

                    let dx = x_b - x_a;
                    let dy = y_b - y_a;
                    let r2 = dx * dx + dy * dy;

                    // Bodies are overlapped!
                    if r2 < 0.0005 && m_a > 0.0 {
                        return (id_a, None);
                    }

                    let a = (G * m_b) / r2;
                    let r = r2.sqrt();
                    vx_a += TIME_STEP * ((dx * a) / r);
                    vy_a += TIME_STEP * ((dy * a) / r);
                }

                (id_a, Some(Velocity(vx_a, vy_a)))
            })
            .collect()
    };

    let mut collided = Vec::new();
    for (id, velocity) in updates {
        match velocity {
            Some(v) => {
                if let Some(Velocity(vx, vy)) = registry.get_component_mut::<Velocity>(id) {
                    *vx += v.0;
                    *vy += v.1;
                }
            }
            None => collided.push(id),
        }
    }

    collided
}

fn apply_velocity(registry: &mut Registry) {
    let ids = registry.entities_with_component::<Velocity>();

    for id in ids {
        let velocity = match registry.get_component::<Velocity>(id) {
            Some(v) => *v,
            None => continue,
        };

        if let Some(Position(x, y)) = registry.get_component_mut::<Position>(id) {
            *x += TIME_STEP * velocity.0;
            *y += TIME_STEP * velocity.1;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = Registry::new();

    // Populate the registry!
    {
        const SQRT_NUM_ENTITIES: usize = 8;
        const SCALE: f32 = 2.0 / ((SQRT_NUM_ENTITIES - 1) as f32);

        for x in 0..SQRT_NUM_ENTITIES {
            for y in 0..SQRT_NUM_ENTITIES {
                let x = ((x as f32) * SCALE) - 1.0;
                let y = ((y as f32) * SCALE) - 1.0;

                let vx = y * 0.003;
                let vy = -x * 0.003;

                let id = registry.create_entity();
                registry.bind::<Mass>(id, Mass(0.00001))?;
                registry.bind::<Position>(id, Position(x, y))?;
                registry.bind::<Velocity>(id, Velocity(vx, vy))?;
            }
        }
    }

    const SIZE: (i32, i32) = (500, 500);
    const OFFSET: (f32, f32) = (250.0, 250.0);
    const SCALE: (f32, f32) = (200.0, 200.0);
    const NUM_ITER: usize = 100;

    let mut dest = std::io::stdout();
    let mut last_positions = HashMap::new();

    writeln!(&mut dest, "<?xml version=\"1.0\" standalone=\"no\"?>")?;
    writeln!(&mut dest, "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.0//EN\" \"http://www.w3.org/TR/2001/REC-SVG-20010904/DTD/svg10.dtd\">")?;
    write!(&mut dest, "<svg xmlns=\"http://www.w3.org/2000/svg\" height=\"{}\" width=\"{}\">", SIZE.0, SIZE.1)?;
    write!(&mut dest, "<rect width=\"100%\" height=\"100%\" fill=\"black\"/>")?;

    for _ in 0..NUM_ITER {
        for _ in 0..10usize {
            for id in apply_acceleration(&mut registry) {
                registry.kill_entity(id);
            }
            apply_velocity(&mut registry);
        }

        // Render result!
        for (id, (&Position(x, y), &Velocity(vx, vy))) in registry.query::<(Position, Velocity), ()>() {
            let v2 = (vx * vx + vy * vy).sqrt();
            let a = 1.0 - (v2 / 0.03).max(0.0).min(0.7);

            if let Some((lx, ly)) = last_positions.get(&id) {
                let x1 = lx * SCALE.0 + OFFSET.0;
                let y1 = ly * SCALE.1 + OFFSET.1;
                let x2 = x * SCALE.0 + OFFSET.0;
                let y2 = y * SCALE.1 + OFFSET.1;

                write!(&mut dest,
                       "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" style=\"stroke:rgba(255,0,0,{});stroke-width:1\" />",
                       x1, y1, x2, y2, a)?;
            }

            last_positions.insert(id, (x, y));
        }
    }

    write!(&mut dest, "</svg>")?;
    Ok(())
}
