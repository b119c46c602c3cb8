use bevy::prelude::*;

use crate::config::{ConfigError, SimConfig};
use crate::engine::messages::SimEvent;
use crate::engine::simulation::Simulation;
use crate::text::WordSwap;

/// Drives the simulation from Bevy's frame clock.
///
/// Built from a config up front so a bad config fails before the app runs.
pub struct PlazaSimPlugin {
    simulation: Simulation,
}

impl PlazaSimPlugin {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            simulation: Simulation::new(config)?,
        })
    }
}

impl Plugin for PlazaSimPlugin {
    fn build(&self, app: &mut App) {
        let [r, g, b] = self.simulation.config().sky_color;
        app.insert_resource(SimulationResource(self.simulation.clone()))
            .insert_resource(ClearColor(Color::srgb_u8(r, g, b)))
            .add_event::<WordSwappedEvent>()
            .add_systems(
                Update,
                (simulation_tick_system, sync_background_system).chain(),
            );
    }
}

#[derive(Resource)]
pub struct SimulationResource(pub Simulation);

/// Mirrors `SimEvent::WordSwapped` into the ECS
#[derive(Event, Debug, Clone)]
pub struct WordSwappedEvent(pub WordSwap);

fn simulation_tick_system(
    time: Res<Time>,
    mut sim: ResMut<SimulationResource>,
    mut swapped: EventWriter<WordSwappedEvent>,
) {
    sim.0.tick(time.delta_secs());
    for event in sim.0.drain_events() {
        match event {
            SimEvent::WordSwapped(swap) => {
                swapped.send(WordSwappedEvent(swap));
            }
        }
    }
}

/// White sky while a swap flash is running, configured sky otherwise
fn sync_background_system(sim: Res<SimulationResource>, mut clear: ResMut<ClearColor>) {
    let [r, g, b] = sim.0.background_color();
    let color = Color::srgb_u8(r, g, b);
    if clear.0 != color {
        clear.0 = color;
    }
}
