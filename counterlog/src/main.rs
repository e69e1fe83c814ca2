//! Keysight 53220A data logger.
//!
//! Loads a pre-generated state file (*.sta) stored locally on the counter, arms the measurement,
//! and polls the result buffer once per second, appending every non-empty reading to a CSV log
//! under `./logs` until the process is interrupted.

use std::time::Duration;

use chrono::Utc;

use counterlog::{LogSink, Poller, StopToken};
use instlink::{TcpInterface, VisaResource};
use keysight_53220a::Keysight53220a;

/// The instrument's VISA resource. Fixed for the run; there are no command-line flags.
const INSTRUMENT_RESOURCE: &str = "TCPIP0::192.168.23.5::inst0::INSTR";

/// Path of the measurement state file on the instrument's own storage.
const STATE_FILE: &str = "INT:\\RAT.EXTRIG.10sec.sta";

/// Fixed polling rate of the result buffer.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

fn main() -> anyhow::Result<()> {
    env_logger::init();
    print_banner();

    let resource = VisaResource::parse(INSTRUMENT_RESOURCE)?;
    let interface = TcpInterface::open_resource(&resource)?;
    let mut inst = Keysight53220a::try_new(interface)?;

    println!("{}", inst.get_name()?);

    // Read the local-to-instrument state file and arm the measurement; results start buffering
    // on the instrument from here on.
    inst.apply_state(STATE_FILE)?;
    inst.initiate()?;

    let mut sink = LogSink::create(&std::env::current_dir()?)?;
    log::info!("Log file path: {}", sink.path().display());
    println!("Logging initiated..");

    // An operator interrupt cancels the token, so the loop ends cleanly and the session still
    // gets closed below instead of the process dying mid-cycle.
    let stop = StopToken::new();
    {
        let stop = stop.clone();
        ctrlc::set_handler(move || stop.cancel())?;
    }

    Poller::new(POLL_INTERVAL).run(&mut inst, &mut sink, &stop)?;

    // The session closes exactly once when `inst` drops.
    Ok(())
}

fn print_banner() {
    println!("---------------------------------");
    println!("   Keysight 53220A Data Logger");
    println!("   {}", Utc::now().format("%Y-%m-%d %H:%M:%S%.6f"));
    println!("---------------------------------");
}
