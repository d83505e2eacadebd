//! Text command parser.
//!
//! One command per line, words separated by whitespace:
//!
//! | Command | Effect |
//! |---------|--------|
//! | `pos` | report position |
//! | `rpm` | report spindle speed |
//! | `zero` | set the zero point here |
//! | `feedtype rot\|time` | cutting feed mode |
//! | `feedrel <mm>` / `travelrel <mm>` | relative move at cutting / travel feed |
//! | `feedabs <mm>` / `travelabs <mm>` | absolute move at cutting / travel feed |
//! | `feedraterpm <mm/rev>` | cutting feed per revolution |
//! | `feedratetime <mm/min>` | cutting feed per minute |
//! | `travelspeed <mm/min>` | travel feed |
//! | `s <rpm>` | manual spindle speed |
//! | `d <ms>` | thread-sync poll interval |
//! | `t` | toggle threading mode |
//! | `acc <us>` | acceleration step |
//! | `maxdelay <us>` | start/end pulse interval |
//! | `stop` | emergency stop |
//!
//! Numeric tuning values are taken by absolute value.

use core::str::FromStr;

use crate::config::units::{Millimeters, MmPerMin, MmPerRev, Rpm};
use crate::config::FeedMode;
use crate::error::{truncated, CommandError, Result};

/// Which feed a move uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Feed {
    /// Cutting feed.
    Cut,
    /// Rapid travel feed.
    Travel,
}

/// How a move distance is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Positioning {
    /// From the current position.
    Relative,
    /// From the zero point.
    Absolute,
}

/// A parsed command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// `pos`
    Position,
    /// `rpm`
    Rpm,
    /// `zero`
    Zero,
    /// `feedtype`
    FeedType(FeedMode),
    /// `feedrel`, `travelrel`, `feedabs`, `travelabs`
    Move {
        /// Feed to move at.
        feed: Feed,
        /// Distance reference.
        positioning: Positioning,
        /// Distance or target.
        distance: Millimeters,
    },
    /// `feedraterpm`
    FeedPerRev(MmPerRev),
    /// `feedratetime`
    FeedPerMin(MmPerMin),
    /// `travelspeed`
    TravelSpeed(MmPerMin),
    /// `s`
    SpindleSpeed(Rpm),
    /// `d`
    SyncInterval(u32),
    /// `t`
    ToggleThreading,
    /// `acc`
    Acceleration(u32),
    /// `maxdelay`
    MaxDelay(u32),
    /// `stop`
    Stop,
}

impl Command {
    /// Parse one command line.
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` for blank lines, unknown words and missing
    /// or malformed arguments.
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let word = words.next().ok_or(CommandError::Empty)?;
        let arg = words.next();

        let cmd = match word {
            "pos" => Command::Position,
            "rpm" => Command::Rpm,
            "zero" => Command::Zero,
            "t" => Command::ToggleThreading,
            "stop" => Command::Stop,
            "feedtype" => Command::FeedType(feed_mode(arg)?),
            "feedrel" => move_cmd(Feed::Cut, Positioning::Relative, arg)?,
            "travelrel" => move_cmd(Feed::Travel, Positioning::Relative, arg)?,
            "feedabs" => move_cmd(Feed::Cut, Positioning::Absolute, arg)?,
            "travelabs" => move_cmd(Feed::Travel, Positioning::Absolute, arg)?,
            "feedraterpm" => Command::FeedPerRev(MmPerRev(magnitude(arg, "mm/rev")?)),
            "feedratetime" => Command::FeedPerMin(MmPerMin(magnitude(arg, "mm/min")?)),
            "travelspeed" => Command::TravelSpeed(MmPerMin(magnitude(arg, "mm/min")?)),
            "s" => Command::SpindleSpeed(Rpm(magnitude(arg, "rpm")?)),
            "d" => Command::SyncInterval(whole(arg, "ms")?),
            "acc" => Command::Acceleration(whole(arg, "us")?),
            "maxdelay" => Command::MaxDelay(whole(arg, "us")?),
            other => return Err(CommandError::Unknown(truncated(other)).into()),
        };
        Ok(cmd)
    }
}

impl FromStr for Command {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        Command::parse(s)
    }
}

fn feed_mode(arg: Option<&str>) -> Result<FeedMode> {
    match arg {
        Some("rot") => Ok(FeedMode::Rotation),
        Some("time") => Ok(FeedMode::Time),
        Some(other) => Err(CommandError::InvalidFeedMode(truncated(other)).into()),
        None => Err(CommandError::MissingArgument("rot|time").into()),
    }
}

fn move_cmd(feed: Feed, positioning: Positioning, arg: Option<&str>) -> Result<Command> {
    Ok(Command::Move {
        feed,
        positioning,
        distance: Millimeters(number(arg, "mm")?),
    })
}

fn number(arg: Option<&str>, name: &'static str) -> Result<f32> {
    let arg = arg.ok_or(CommandError::MissingArgument(name))?;
    match arg.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CommandError::InvalidArgument(truncated(arg)).into()),
    }
}

fn magnitude(arg: Option<&str>, name: &'static str) -> Result<f32> {
    number(arg, name).map(f32::abs)
}

fn whole(arg: Option<&str>, name: &'static str) -> Result<u32> {
    let arg = arg.ok_or(CommandError::MissingArgument(name))?;
    let value = arg
        .parse::<i64>()
        .map_err(|_| CommandError::InvalidArgument(truncated(arg)))?;
    Ok(value.unsigned_abs().min(u32::MAX as u64) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_simple_words() {
        assert_eq!(Command::parse("pos").unwrap(), Command::Position);
        assert_eq!(Command::parse("  stop \r").unwrap(), Command::Stop);
        assert_eq!(Command::parse("t").unwrap(), Command::ToggleThreading);
    }

    #[test]
    fn test_moves() {
        assert_eq!(
            Command::parse("feedrel -2.5").unwrap(),
            Command::Move {
                feed: Feed::Cut,
                positioning: Positioning::Relative,
                distance: Millimeters(-2.5),
            }
        );
        assert_eq!(
            "travelabs 10".parse::<Command>().unwrap(),
            Command::Move {
                feed: Feed::Travel,
                positioning: Positioning::Absolute,
                distance: Millimeters(10.0),
            }
        );
    }

    #[test]
    fn test_tuning_values_are_absolute() {
        assert_eq!(Command::parse("acc -20").unwrap(), Command::Acceleration(20));
        assert_eq!(Command::parse("maxdelay 3000").unwrap(), Command::MaxDelay(3000));
        assert_eq!(
            Command::parse("s -150").unwrap(),
            Command::SpindleSpeed(Rpm(150.0))
        );
        assert_eq!(
            Command::parse("feedratetime -60").unwrap(),
            Command::FeedPerMin(MmPerMin(60.0))
        );
    }

    #[test]
    fn test_feed_type() {
        assert_eq!(
            Command::parse("feedtype rot").unwrap(),
            Command::FeedType(FeedMode::Rotation)
        );
        assert!(matches!(
            Command::parse("feedtype fast"),
            Err(Error::Command(CommandError::InvalidFeedMode(_)))
        ));
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            Command::parse("   "),
            Err(Error::Command(CommandError::Empty))
        );
        assert_eq!(
            Command::parse("feedrel"),
            Err(Error::Command(CommandError::MissingArgument("mm")))
        );
        assert!(matches!(
            Command::parse("acc 1.5"),
            Err(Error::Command(CommandError::InvalidArgument(_)))
        ));
        match Command::parse("jog 5") {
            Err(Error::Command(CommandError::Unknown(word))) => assert_eq!(word.as_str(), "jog"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
