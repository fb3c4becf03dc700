use sparse_ecs::{component, Registry};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MyComponent(i32);

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frozen;

component!(MyComponent, Frozen);

impl From<i32> for MyComponent {
    fn from(x: i32) -> Self {
        MyComponent(x)
    }
}

fn main() {
    let mut registry = Registry::new();

    let entity = registry.create_entity();
    let frozen = registry.create_entity();
    registry.bind::<MyComponent>(entity, 3).unwrap();
    registry.bind::<MyComponent>(frozen, 4).unwrap();
    registry.bind::<Frozen>(frozen, Frozen).unwrap();

    println!("registry: {:?}", registry);
    println!("entity: {:?}", entity);

    let (value, is_frozen) = registry.get_components::<(MyComponent, Frozen)>(entity);
    println!("component: {:?}, frozen: {:?}", value, is_frozen);

    for (id, (value,)) in registry.query::<(MyComponent,), (Frozen,)>() {
        println!("thawed: {:?} = {:?}", id, value);
    }

    registry.kill_entity(entity);
    println!("alive after kill: {}", registry.is_alive(entity));
}
