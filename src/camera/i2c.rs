// SPDX-License-Identifier: GPL-3.0-or-later
use std::convert::TryFrom;
use std::path::PathBuf;
use std::str::FromStr;

use i2cdev::linux::LinuxI2CError;
use linux_embedded_hal::I2cdev;
use serde::Deserialize;

use crate::util::parse_int_decimal_hex;

/// An I2C bus, either by number (`1` is `/dev/i2c-1`) or by device path.
///
/// Strings that look like numbers (`"1"`, `"0x1"`) are treated as bus numbers.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(from = "BusValue")]
pub(crate) enum Bus {
    Number(u32),
    Path(PathBuf),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BusValue {
    Number(u32),
    Text(String),
}

impl From<BusValue> for Bus {
    fn from(value: BusValue) -> Self {
        match value {
            BusValue::Number(bus) => Self::Number(bus),
            BusValue::Text(text) => match text.parse() {
                Ok(bus) => bus,
                Err(never) => match never {},
            },
        }
    }
}

impl FromStr for Bus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse_int_decimal_hex(s)
            .map(Self::Number)
            .unwrap_or_else(|_| Self::Path(PathBuf::from(s))))
    }
}

impl TryFrom<&Bus> for I2cdev {
    type Error = LinuxI2CError;

    fn try_from(bus: &Bus) -> Result<Self, Self::Error> {
        let device_path = match bus {
            Bus::Number(n) => PathBuf::from(format!("/dev/i2c-{}", n)),
            Bus::Path(p) => p.clone(),
        };
        I2cdev::new(device_path)
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::Bus;

    #[test]
    fn bus_num_from_decimal_string() {
        let bus: Bus = "0".parse().unwrap();
        assert_eq!(bus, Bus::Number(0))
    }

    #[test]
    fn bus_num_from_hex_string() {
        let bus: Bus = "0x68".parse().unwrap();
        assert_eq!(bus, Bus::Number(0x68))
    }

    #[test]
    fn bus_path_from_string() {
        let bus: Bus = "/dev/i2c-0".parse().unwrap();
        assert_eq!(bus, Bus::Path(PathBuf::from("/dev/i2c-0")));
    }

    #[test]
    fn bus_from_toml() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            bus: Bus,
        }
        let number: Wrapper = toml::from_str("bus = 3").unwrap();
        assert_eq!(number.bus, Bus::Number(3));
        let path: Wrapper = toml::from_str("bus = \"/dev/i2c-7\"").unwrap();
        assert_eq!(path.bus, Bus::Path(PathBuf::from("/dev/i2c-7")));
        let text: Wrapper = toml::from_str("bus = \"0x2\"").unwrap();
        assert_eq!(text.bus, Bus::Number(2));
    }
}
