//! Builds the example astrocyte network: one astrocyte feeding two neurons
//! and a recorder. The astrocyte's output current is drawn from the seed so
//! runs are reproducible.

use rand::{rngs::StdRng, Rng, SeedableRng};
use sim::astrocyte::Astrocyte;
use sim::connection::ConnectionConfig;
use sim::connector::Connector;
use sim::neuron::Neuron;
use sim::recorder::Recorder;

pub fn new_astro_env(seed: u64) -> Connector {
    let mut rng: StdRng = SeedableRng::seed_from_u64(seed);
    let output_current = rng.gen_range(1.0, 5.0);

    let mut connector = Connector::new();
    connector.add_unit("astro", Astrocyte::new("astro", output_current));
    connector.add_unit("pyramidal-1", Neuron::new("pyramidal-1", 2));
    connector.add_unit("pyramidal-2", Neuron::new("pyramidal-2", 1));
    connector.add_unit("recorder", Recorder::new("recorder"));

    connector
        .connect(
            "astro",
            "pyramidal-1",
            0,
            ConnectionConfig {
                weight: 2.0,
                delay_steps: 2,
            },
        )
        .expect("wiring astro -> pyramidal-1");
    connector
        .connect(
            "astro",
            "pyramidal-1",
            1,
            ConnectionConfig {
                weight: 0.5,
                delay_steps: 1,
            },
        )
        .expect("wiring astro -> pyramidal-1 (second receptor)");
    connector
        .connect(
            "astro",
            "pyramidal-2",
            0,
            ConnectionConfig {
                weight: -1.0,
                delay_steps: 1,
            },
        )
        .expect("wiring astro -> pyramidal-2");
    connector
        .connect("astro", "recorder", 0, ConnectionConfig::default())
        .expect("wiring astro -> recorder");
    connector
}
