//! Drive demo
//!
//! Builds a small walled arena, then drives one agent through it with both
//! resolvers and logs every step. An optional TOML or RON file overrides the
//! collision settings.

use arcade_collision::foundation::logging;
use arcade_collision::foundation::math::{transform_vector, utils};
use arcade_collision::prelude::*;

/// Steps driven per resolver
const STEPS: usize = 60;
/// Distance covered per step
const SPEED: f32 = 0.25;
/// Arena half-width; walls sit on +/- this value
const ARENA_HALF_EXTENT: f32 = 6.0;
const WALL_HEIGHT: f32 = 3.0;

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("failed to load settings from '{path}': {source}")]
    Settings {
        path: String,
        #[source]
        source: ConfigError,
    },
    #[error(transparent)]
    Collider(#[from] ColliderError),
}

/// Axis-aligned box mesh centred on the origin
fn box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);
    let positions = vec![
        Vec3::new(-x, -y, -z),
        Vec3::new(x, -y, -z),
        Vec3::new(x, y, -z),
        Vec3::new(-x, y, -z),
        Vec3::new(-x, -y, z),
        Vec3::new(x, -y, z),
        Vec3::new(x, y, z),
        Vec3::new(-x, y, z),
    ];
    let indices = vec![
        0, 2, 1, 0, 3, 2, // back
        4, 5, 6, 4, 6, 7, // front
        0, 4, 7, 0, 7, 3, // left
        1, 2, 6, 1, 6, 5, // right
        3, 7, 6, 3, 6, 2, // top
        0, 1, 5, 0, 5, 4, // bottom
    ];
    MeshData::indexed(positions, indices)
}

fn build_arena() -> SceneNode {
    let span = ARENA_HALF_EXTENT * 2.0;
    let wall_y = WALL_HEIGHT * 0.5;

    SceneNode::new("arena")
        .with_child(
            SceneNode::new("Ground")
                .with_mesh(box_mesh(span, 0.2, span))
                .with_transform(utils::translation(0.0, -0.1, 0.0)),
        )
        .with_child(
            SceneNode::new("wall_north")
                .with_mesh(box_mesh(span, WALL_HEIGHT, 0.5))
                .with_transform(utils::translation(0.0, wall_y, ARENA_HALF_EXTENT)),
        )
        .with_child(
            SceneNode::new("wall_south")
                .with_mesh(box_mesh(span, WALL_HEIGHT, 0.5))
                .with_transform(utils::translation(0.0, wall_y, -ARENA_HALF_EXTENT)),
        )
        .with_child(
            SceneNode::new("wall_east")
                .with_mesh(box_mesh(0.5, WALL_HEIGHT, span))
                .with_transform(utils::translation(ARENA_HALF_EXTENT, wall_y, 0.0)),
        )
        .with_child(
            SceneNode::new("wall_west")
                .with_mesh(box_mesh(0.5, WALL_HEIGHT, span))
                .with_transform(utils::translation(-ARENA_HALF_EXTENT, wall_y, 0.0)),
        )
        .with_child(
            SceneNode::new("pillar")
                .with_mesh(box_mesh(1.0, WALL_HEIGHT, 1.0))
                .with_transform(utils::translation(2.0, wall_y, 0.0) * utils::rotation_y(utils::deg_to_rad(45.0))),
        )
}

fn load_settings() -> Result<CollisionSettings, DemoError> {
    let Some(path) = std::env::args().nth(1) else {
        log::info!("No settings file given; using defaults");
        return Ok(CollisionSettings::default());
    };

    let settings = CollisionSettings::load_from_file(&path).map_err(|source| DemoError::Settings {
        path: path.clone(),
        source,
    })?;
    log::info!("Loaded settings from {}", path);
    Ok(settings)
}

/// Drive the agent in a straight line across the arena with the capsule
/// resolver, turning 90 degrees every time it is blocked
fn drive_capsule(collider: &Collider, settings: &CollisionSettings) -> Result<(), DemoError> {
    let mut position = Vec3::new(-3.0, 0.0, -1.0);
    let mut heading = Vec3::new(1.0, 0.0, 0.2).normalize();
    let quarter_turn = utils::rotation_y(utils::deg_to_rad(90.0));
    let mut contacts = 0;

    for step in 0..STEPS {
        let desired = position + heading * SPEED;
        let result = resolve_capsule(position, desired, Some(collider), settings)?;

        if result.collided {
            contacts += 1;
            heading = transform_vector(&quarter_turn, heading);
            log::info!(
                "[capsule {:02}] blocked at ({:.3}, {:.3}); turning to ({:.2}, {:.2})",
                step,
                result.position.x,
                result.position.z,
                heading.x,
                heading.z
            );
        } else {
            log::debug!("[capsule {:02}] ({:.3}, {:.3})", step, result.position.x, result.position.z);
        }
        position = result.position;
    }

    log::info!("Capsule run finished at {:?} after {} contacts", position, contacts);
    Ok(())
}

/// Drive the agent with the velocity-cancelling resolver
fn drive_simple(collider: &Collider, settings: &CollisionSettings) -> Result<(), DemoError> {
    let mut position = Vec3::new(-3.0, 0.5, 3.0);
    let mut velocity = Vec3::new(SPEED, 0.0, -SPEED * 0.5);
    let mut contacts = 0;

    for step in 0..STEPS {
        let result = resolve_simple(position, velocity, Some(collider), settings.radius)?;
        if let Some(corrected) = result.velocity {
            velocity = corrected;
        }
        if result.collided {
            contacts += 1;
            log::info!(
                "[simple {:02}] corrected velocity to ({:.3}, {:.3})",
                step,
                velocity.x,
                velocity.z
            );
        } else {
            log::debug!("[simple {:02}] ({:.3}, {:.3})", step, result.position.x, result.position.z);
        }
        position = result.position;
    }

    log::info!("Simple run finished at {:?} after {} contacts", position, contacts);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level("info");
    log::info!("Starting drive demo");

    let settings = load_settings()?;
    settings.validate()?;

    let arena = build_arena();
    let collider = Collider::from_scene(&arena, &ColliderConfig::default())?;
    let bounds = collider.bounds();
    log::info!("Arena bounds: {:?} .. {:?}", bounds.min, bounds.max);

    let envelope = WireframeMesh::capsule_envelope(&settings, true);
    log::debug!(
        "Agent envelope: {} vertices, {} lines",
        envelope.positions.len(),
        envelope.line_count()
    );

    drive_capsule(&collider, &settings)?;
    drive_simple(&collider, &settings)?;

    log::info!("Drive demo complete");
    Ok(())
}
