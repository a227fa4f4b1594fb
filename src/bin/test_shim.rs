//! Simple test binary for the driver-module shim
//! Loads an example driver, exercises ioctl and the diagnostic file, and
//! unloads again to prove the full lifecycle works

use driver_module_shim::{
    CapabilityRecord, DiagnosticSink, DriverModule, Host, MapRegion, PageBuffer, Result,
    StreamSink,
};
use std::sync::Arc;

/// Host that registers into process memory and logs to stdout
struct StdoutHost;

impl Host for StdoutHost {
    fn register_device(&self, major: u32, name: &str) -> Result<u32> {
        let assigned = if major == 0 { 254 } else { major };
        println!("[host] registered device ({assigned}, {name})");
        Ok(assigned)
    }

    fn unregister_device(&self, major: u32, name: &str) {
        println!("[host] unregistered device ({major}, {name})");
    }

    fn publish_diagnostic(&self, name: &str) -> Result<()> {
        println!("[host] published diagnostic file {name}");
        Ok(())
    }

    fn remove_diagnostic(&self, name: &str) {
        println!("[host] removed diagnostic file {name}");
    }

    fn log_line(&self, line: &str) {
        println!("[log] {line}");
    }
}

fn example_record() -> CapabilityRecord {
    let mut record = CapabilityRecord::new("exampledrv", 0);
    record.init = Some(Box::new(|| {
        println!("[driver] init");
        Ok(())
    }));
    record.cleanup = Some(Box::new(|| println!("[driver] cleanup")));
    record.ioctl = Some(Box::new(|cmd, arg| {
        println!("[driver] ioctl(cmd={cmd}, arg={arg})");
        Ok(arg as i64)
    }));
    record.diagnostic_dump = Some(Box::new(|sink| {
        sink.append_fmt(format_args!("state=ok\n"));
        sink.append_fmt(format_args!("sessions=0\n"));
    }));
    record
}

fn main() {
    let _ = tracing_subscriber::fmt().try_init();

    let module = DriverModule::new(Arc::new(StdoutHost));

    let major = match module.load(|| Some(example_record())) {
        Ok(major) => major,
        Err(err) => {
            eprintln!("load failed: {err} (status {})", err.errno());
            std::process::exit(1);
        }
    };
    println!("loaded exampledrv with major {major}");

    let device = module.device().expect("device dispatcher");
    device.open();
    match device.ioctl(7, 42) {
        Ok(result) => println!("ioctl(7, 42) = {result}"),
        Err(err) => println!("ioctl failed: {err}"),
    }

    let mut region = MapRegion {
        start: 0,
        len: 4096,
        offset: 0,
    };
    match device.mmap(-1, &mut region) {
        Ok(()) => println!("mmap succeeded"),
        Err(err) => println!("mmap denied as expected: {err}"),
    }

    let diag = module.diagnostic().expect("diagnostic file");

    // Read through both sink variants; output must be identical.
    let mut page = PageBuffer::new();
    diag.dump(&mut page);
    let mut streamed = String::new();
    diag.dump(&mut StreamSink::new(&mut streamed));
    assert_eq!(page.as_str(), streamed);
    print!("diagnostic dump:\n{}", page.as_str());

    // Toggle debugging; the next device operation logs through the gate.
    diag.write(b"d1");
    device.ioctl(7, 43).ok();
    device.release();
    diag.write(b"d0");

    module.unload();
    println!("unloaded, is_loaded={}", module.is_loaded());
}
