mod astro;

use crate::astro::new_astro_env;
use clap::{App, Arg};
use rand::Rng;

fn main() {
    let matches = App::new("Astrocyte Network Simulator")
        .arg(
            Arg::with_name("print_graph")
                .short("g")
                .long("print_graph")
                .value_name("PRINT_GRAPH")
                .help("Set if you want to produce a pdf of the graph you create"),
        )
        .arg(
            Arg::with_name("random_num_seed")
                .short("r")
                .long("random_num_seed")
                .value_name("RANDOM_NUM_SEED")
                .help("A seed for the astrocyte's output current."),
        )
        .get_matches();

    let seed_arg = matches.value_of("random_num_seed");
    let seed;
    if seed_arg.is_none() {
        let mut rng = rand::thread_rng();
        seed = rng.gen::<u64>();
        print!("Using seed {0}\n", seed);
    } else {
        seed = seed_arg.unwrap().parse::<u64>().unwrap();
    }

    // Create the connector object.
    let mut connector = new_astro_env(seed);

    // Print the graph
    if let Some(_argument) = matches.value_of("print_graph") {
        connector.print_graph();
    }

    // Execute the simulation
    for step in 0..20 {
        connector.tick(step);
        print!(
            "Recorded currents:\n {0}\n\n\n\n",
            connector.query_recorder("recorder")
        );
    }
    print!(
        "Recorded currents:\n {0}",
        connector.query_recorder("recorder")
    );
}
