use anyhow::{anyhow, Context};
use log::info;
use structopt::StructOpt;

use tos428::{Config, Device, DeviceInfo, RomList};

mod cli;

fn print_info(info: &DeviceInfo) {
    println!("Device: {}", info.welcome);
    println!("Startup orientation: {}", info.startup_way);
    println!("4-way color: {}", info.four_way_color);
    println!("8-way color: {}", info.eight_way_color);
    println!("Keyboard color: {}", info.keyboard_color);
}

fn main() -> Result<(), anyhow::Error> {
    use cli::Command;

    // Create a logger with a timestamp that logs everything at Info level or above
    pretty_env_logger::init_timed();

    let opts = cli::Opts::from_args();

    if let Command::ExportRomlist { path } = &opts.command {
        RomList::export_embedded(path)
            .with_context(|| format!("Could not export ROM list to {}", path.display()))?;

        return Ok(());
    }

    let port = opts
        .device
        .ok_or_else(|| anyhow!("No device given, use --device or TOS428_DEVICE"))?;
    let roms = RomList::load(opts.rom_list.as_deref()).context("Could not load ROM list")?;

    let mut config = Config::new(port);
    config.restrictor = opts.restrictor;
    config.roms = roms;

    let mut device = Device::open(config)?;

    match opts.command {
        Command::Info => print_info(&device.info()?),
        Command::Way { way } => {
            let restrictor = device.config().restrictor;

            device.set_way(restrictor, way)?;
        }
        Command::Rom { rom } => {
            let way = device.set_way_for_rom(&rom)?;

            info!("{} uses {}-way", rom.display(), way);
        }
        Command::Color { mode, color: None } => println!("{}", device.get_color(mode)?),
        Command::Color {
            mode,
            color: Some(color),
        } => device.set_color(mode, color)?,
        Command::Silent { state: None } => println!("{}", device.get_silent()?),
        Command::Silent { state: Some(state) } => device.set_silent(state.into())?,
        Command::StartupWay { way: None } => println!("{}", device.get_startup_way()?),
        Command::StartupWay { way: Some(way) } => device.set_startup_way(way)?,
        Command::Keys => {
            for key in device.get_key_list()? {
                println!("{}", key);
            }
        }
        Command::DumpEeprom => println!("{}", device.dump_eeprom()?),
        Command::FactoryReset { permanent } => {
            device.restore_factory()?;

            if permanent {
                device.make_permanent()?;
            }
        }
        Command::Raw { command } => println!("{}", device.raw(&command)?),
        Command::ExportRomlist { .. } => unreachable!("handled before opening the device"),
    }

    Ok(())
}
