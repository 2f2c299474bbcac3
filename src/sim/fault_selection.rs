use crate::flight_control::lander_io::{Quantity, Thruster};
use rand::{Rng, seq::IndexedRandom};
use strum_macros::{Display, EnumIter};

/// A lander component that can be failed.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumIter)]
pub enum Component {
    MainThruster,
    LeftThruster,
    RightThruster,
    VelocityXSensor,
    VelocityYSensor,
    PositionXSensor,
    PositionYSensor,
    AngleSensor,
    Sonar,
}

impl Component {
    pub const THRUSTERS: [Component; 3] = [Component::MainThruster, Component::LeftThruster, Component::RightThruster];
    pub const SENSORS: [Component; 6] = [
        Component::VelocityXSensor,
        Component::VelocityYSensor,
        Component::PositionXSensor,
        Component::PositionYSensor,
        Component::AngleSensor,
        Component::Sonar,
    ];

    /// Maps the command-line code (1 to 9) to a component.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Component::MainThruster),
            2 => Some(Component::LeftThruster),
            3 => Some(Component::RightThruster),
            4 => Some(Component::VelocityXSensor),
            5 => Some(Component::VelocityYSensor),
            6 => Some(Component::PositionXSensor),
            7 => Some(Component::PositionYSensor),
            8 => Some(Component::AngleSensor),
            9 => Some(Component::Sonar),
            _ => None,
        }
    }

    pub fn thruster(self) -> Option<Thruster> {
        match self {
            Component::MainThruster => Some(Thruster::Main),
            Component::LeftThruster => Some(Thruster::Left),
            Component::RightThruster => Some(Thruster::Right),
            _ => None,
        }
    }

    pub fn quantity(self) -> Option<Quantity> {
        match self {
            Component::VelocityXSensor => Some(Quantity::VelocityX),
            Component::VelocityYSensor => Some(Quantity::VelocityY),
            Component::PositionXSensor => Some(Quantity::PositionX),
            Component::PositionYSensor => Some(Quantity::PositionY),
            Component::AngleSensor => Some(Quantity::Angle),
            _ => None,
        }
    }
}

/// Which failures a run injects.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display)]
pub enum FailureMode {
    /// Nothing fails.
    Nominal,
    /// Random thrusters fail at random times.
    Controls,
    /// Random thrusters and sensors fail at random times.
    ControlsAndSensors,
    /// The listed components fail from the start.
    Listed,
}

#[derive(Debug, PartialEq, Eq, Display)]
pub enum FaultSelectionError {
    #[strum(to_string = "missing failure mode, expected 0 to 3")]
    MissingMode,
    #[strum(to_string = "invalid failure mode '{value}', expected 0 to 3")]
    InvalidMode { value: String },
    #[strum(to_string = "invalid component '{value}', expected 1 to 9")]
    InvalidComponent { value: String },
    #[strum(to_string = "components can only be listed with failure mode 3")]
    UnexpectedComponents,
    #[strum(to_string = "failure mode 3 needs at least one component")]
    NoComponents,
}

impl std::error::Error for FaultSelectionError {}

/// A component failure taking effect at `onset`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ScheduledFault {
    pub component: Component,
    pub onset: u64,
}

/// The failures of one run, in no particular order.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct FaultPlan {
    faults: Vec<ScheduledFault>,
}

impl FaultPlan {
    pub fn new(faults: Vec<ScheduledFault>) -> Self { Self { faults } }

    /// A plan failing every given component at tick zero.
    pub fn immediate(components: impl IntoIterator<Item = Component>) -> Self {
        Self::new(components.into_iter().map(|component| ScheduledFault { component, onset: 0 }).collect())
    }

    pub fn faults(&self) -> &[ScheduledFault] { &self.faults }

    pub fn is_empty(&self) -> bool { self.faults.is_empty() }

    /// Removes and returns the faults due at or before `tick`.
    pub fn take_due(&mut self, tick: u64) -> Vec<Component> {
        let (due, pending): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.faults).into_iter().partition(|f| f.onset <= tick);
        self.faults = pending;
        due.into_iter().map(|f| f.component).collect()
    }
}

/// Parsed command-line failure selection: `<mode> [components..]`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FaultSelection {
    mode: FailureMode,
    components: Vec<Component>,
}

impl FaultSelection {
    /// Latest tick at which a random fault may set in.
    pub const MAX_ONSET: u64 = 1500;

    /// Parses the arguments following the program name.
    pub fn from_args<I, S>(args: I) -> Result<Self, FaultSelectionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        let mode_arg = args.next().ok_or(FaultSelectionError::MissingMode)?;
        let mode = match mode_arg.as_ref().trim() {
            "0" => FailureMode::Nominal,
            "1" => FailureMode::Controls,
            "2" => FailureMode::ControlsAndSensors,
            "3" => FailureMode::Listed,
            other => return Err(FaultSelectionError::InvalidMode { value: other.to_string() }),
        };
        let components = args
            .map(|arg| {
                let raw = arg.as_ref().trim();
                raw.parse::<u8>()
                    .ok()
                    .and_then(Component::from_code)
                    .ok_or_else(|| FaultSelectionError::InvalidComponent { value: raw.to_string() })
            })
            .collect::<Result<Vec<_>, _>>()?;
        match (mode, components.is_empty()) {
            (FailureMode::Listed, true) => Err(FaultSelectionError::NoComponents),
            (FailureMode::Listed, false) | (_, true) => Ok(Self { mode, components }),
            (_, false) => Err(FaultSelectionError::UnexpectedComponents),
        }
    }

    pub fn nominal() -> Self { Self { mode: FailureMode::Nominal, components: Vec::new() } }

    pub fn mode(&self) -> FailureMode { self.mode }
    pub fn components(&self) -> &[Component] { &self.components }

    /// Turns the selection into concrete faults.
    ///
    /// Random modes never fail all three thrusters: one or two are picked, and with
    /// [`FailureMode::ControlsAndSensors`] one or two sensors as well. Listed components fail
    /// immediately.
    pub fn resolve(&self, rng: &mut impl Rng) -> FaultPlan {
        match self.mode {
            FailureMode::Nominal => FaultPlan::default(),
            FailureMode::Listed => FaultPlan::immediate(self.components.iter().copied()),
            FailureMode::Controls => FaultPlan::new(Self::pick(&Component::THRUSTERS, rng)),
            FailureMode::ControlsAndSensors => {
                let mut faults = Self::pick(&Component::THRUSTERS, rng);
                faults.extend(Self::pick(&Component::SENSORS, rng));
                FaultPlan::new(faults)
            }
        }
    }

    fn pick(pool: &[Component], rng: &mut impl Rng) -> Vec<ScheduledFault> {
        let count = rng.random_range(1..=2);
        let chosen: Vec<Component> = pool.choose_multiple(&mut *rng, count).copied().collect();
        chosen
            .into_iter()
            .map(|component| ScheduledFault { component, onset: rng.random_range(0..=Self::MAX_ONSET) })
            .collect()
    }
}
