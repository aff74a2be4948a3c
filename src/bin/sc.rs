extern crate sportcal as lib;

use chrono::Local;
use flexi_logger::{FileSpec, Logger};
use lib::activity::Activity;
use lib::config::Config;
use lib::grid::TileLayout;
use lib::parse;
use lib::render::{self, SvgCanvas};
use lib::store::ActivityLog;
use lib::{CalendarDate, CalendarGeometry};
use std::fs;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "sc",
    about = "sportcal - a year grid of your daily workouts."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,

    #[structopt(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Print the year grid to the terminal
    Show {
        #[structopt(help = "year to show, defaults to the current one")]
        year: Option<i32>,
    },
    /// List the activities of one day
    Day {
        #[structopt(help = "date as YYYY-MM-DD")]
        date: CalendarDate,
    },
    /// Log an activity, missing values are taken from the sport's defaults
    Add {
        date: CalendarDate,
        sport: String,
        #[structopt(short = "t", long = "duration", help = "duration as HH:MM")]
        duration: Option<String>,
        #[structopt(short = "d", long = "distance")]
        distance: Option<f64>,
        #[structopt(short = "i", long = "intensity")]
        intensity: Option<u8>,
        #[structopt(short = "m", long = "description")]
        description: Option<String>,
    },
    /// Remove the n-th activity (starting at 1) of a day
    Remove { date: CalendarDate, number: usize },
    /// Write the year grid as SVG
    Svg {
        year: Option<i32>,
        #[structopt(short = "o", long = "output", parse(from_os_str))]
        output: Option<PathBuf>,
    },
}

fn open_log(config: &Config, year: i32) -> lib::Result<ActivityLog> {
    Ok(ActivityLog::open(&config.data_dir, &config.file_prefix, year)?
        .with_max_per_day(config.max_activities))
}

fn print_day(log: &ActivityLog, date: &CalendarDate) {
    println!("{} ({})", date, date.weekday());
    for (i, act) in log.activities(date).iter().enumerate() {
        println!(
            "{:>3}. {:<10} {} {:>8} {:>3} {}",
            i + 1,
            act.sport,
            parse::format_duration(&act.duration),
            act.distance.map(|d| d.to_string()).unwrap_or_default(),
            act.intensity.map(|n| n.to_string()).unwrap_or_default(),
            act.description
        );
    }
    println!(
        "     total {}",
        parse::format_duration(&log.total_duration(date))
    );
}

fn run(config: &Config, cmd: Command) -> lib::Result<()> {
    let today = CalendarDate::from(Local::now().naive_local().date());
    let scale = config.color_scale()?;

    match cmd {
        Command::Show { year } => {
            let year = year.unwrap_or_else(|| today.year());
            let geometry = CalendarGeometry::new(year)?;
            let log = open_log(config, year)?;
            let selected = if today.year() == year { Some(&today) } else { None };
            print!(
                "{}",
                render::terminal_grid(&geometry, Some(&log), &scale, selected)
            );
        }
        Command::Day { date } => {
            let log = open_log(config, date.year())?;
            print_day(&log, &date);
        }
        Command::Add {
            date,
            sport,
            duration,
            distance,
            intensity,
            description,
        } => {
            let duration = duration.map(|d| parse::parse_duration(&d)).transpose()?;
            let defaults = config.activity_defaults()?;

            let mut activity = Activity::new(&sport, defaults.duration_for(&sport, duration));
            activity.distance = distance;
            activity.intensity = intensity;
            if let Some(text) = description {
                activity = activity.description(&text);
            }

            if let Some(default) = defaults.get(&activity.sport) {
                activity = activity.with_defaults(default);
            } else {
                log::debug!("No defaults for sport '{}'", activity.sport);
            }

            let mut log = open_log(config, date.year())?;
            log.add(date, activity)?;
            log.save()?;
            print_day(&log, &date);
        }
        Command::Remove { date, number } => {
            let mut log = open_log(config, date.year())?;
            let removed = log.remove(&date, number)?;
            log.save()?;
            println!("removed {} on {}", removed.sport, date);
        }
        Command::Svg { year, output } => {
            let year = year.unwrap_or_else(|| today.year());
            let geometry = CalendarGeometry::new(year)?;
            let log = open_log(config, year)?;
            let layout = TileLayout::new(config.tile_size);

            let mut canvas = SvgCanvas::new(&layout);
            let selected = if today.year() == year { Some(&today) } else { None };
            render::draw_year(&mut canvas, &geometry, &layout, Some(&log), &scale, selected);
            let svg = canvas.finish();

            match output {
                Some(path) => {
                    fs::write(&path, svg)?;
                    log::info!("Wrote '{}'", path.display());
                }
                None => print!("{}", svg),
            }
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    let _logger = logger.start()?;

    std::panic::set_hook(Box::new(move |info| {
        // Drop any colour left over from a half-written grid row
        println!("{}", termion::color::Bg(termion::color::Reset));

        println!("sportcal ran into a fatal error!");
        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    let cmd = args.cmd.unwrap_or(Command::Show { year: None });
    run(&config, cmd)?;

    Ok(())
}
