use crate::flight_control::lander_io::Quantity;
use bitvec::{BitArr, array::BitArray, order::Lsb0};
use strum::{EnumCount, IntoEnumIterator};

/// Latched health verdicts for every monitored [`Quantity`].
///
/// Each sensor starts out healthy. A set bit marks a condemned sensor; bits are only ever
/// set, never cleared, so a sensor that has been condemned once stays condemned for the
/// remainder of the flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorHealth {
    condemned: BitArr!(for Quantity::COUNT, in u8, Lsb0),
}

impl SensorHealth {
    /// Creates a new `SensorHealth` with all sensors healthy.
    pub fn new() -> Self { Self { condemned: BitArray::ZERO } }

    /// Returns `true` while the sensor for `quantity` has not been condemned.
    pub fn is_healthy(&self, quantity: Quantity) -> bool { !self.condemned[quantity.index()] }

    /// Permanently marks the sensor for `quantity` as unreliable.
    ///
    /// # Returns
    /// `true` if this call flipped the flag, `false` if the sensor was already condemned.
    pub(crate) fn condemn(&mut self, quantity: Quantity) -> bool {
        let newly = self.is_healthy(quantity);
        self.condemned.set(quantity.index(), true);
        newly
    }

    /// Iterates over all condemned quantities.
    pub fn condemned(&self) -> impl Iterator<Item = Quantity> + '_ {
        Quantity::iter().filter(|q| !self.is_healthy(*q))
    }

    /// Bit-packed representation, bit `i` set for condemned quantity index `i`.
    pub fn bits(&self) -> u8 { self.condemned.as_raw_slice()[0] }
}

impl Default for SensorHealth {
    fn default() -> Self { Self::new() }
}
