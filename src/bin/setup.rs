//! This file produces a binary that runs Setup and KeyGen for security parameter 10, writes the
//! generated parameters to `a_param.txt` and `a_param.json` and prints the public values.
//!
//! Set `RUST_LOG=spe=debug` to follow the individual stages.

use std::fs::File;
use std::process::ExitCode;

use spe::{dump, GroupElement, Result, Setup, SetupConfig};
use tracing::{error, info};
use tracing_subscriber::prelude::*;

const LEGACY_PATH: &str = "a_param.txt";
const JSON_PATH: &str = "a_param.json";

fn setup_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spe=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<()> {
    let mut rng = rand::thread_rng();
    let mut setup: Setup = Setup::new(SetupConfig::with_security_bits(10));

    let dp = setup.generate_parameters(&mut rng)?.clone();
    dump::write_legacy(&dp, File::create(LEGACY_PATH)?)?;
    dump::save(&dp, JSON_PATH)?;
    info!(legacy = LEGACY_PATH, json = JSON_PATH, "wrote parameter files");

    setup.initialize_context()?;

    let check = setup.check_bilinearity(&mut rng)?;
    println!("e(2 g1, 3 g2) == e(g1, g2)^6:\t{}", check.holds());

    setup.select_generator(&mut rng)?;
    let pp = setup.finalize()?.clone();

    println!("r:\t{}", dp.group_order);
    println!("q:\t{}", dp.field_prime);
    println!("h:\t{}", dp.cofactor);
    println!("r (legacy layout):\t{}", dump::legacy_group_order(&dump::to_legacy_string(&dp))?);
    println!("P:\t{:?}", pp.generator());

    let hp = setup.h1(&GroupElement::G1(pp.generator().clone()))?;
    let hm = setup.h2(b"HelloWorld")?;
    println!("h1(P):\t{}", hp);
    println!("h2(\"HelloWorld\"):\t{}", hm);

    let keys = setup.keygen(&mut rng)?;
    for kp in [&keys.data_user, &keys.data_sender].iter() {
        println!("{} secret:\t{}", kp.role().label(), kp.secret());
        println!("{} public:\t{:?}", kp.role().label(), kp.public());
        println!("{} verified:\t{}", kp.role().label(), kp.verify(&pp));
    }

    Ok(())
}

fn main() -> ExitCode {
    setup_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "setup failed");
            ExitCode::FAILURE
        }
    }
}
