//! Invocation boundary.
//!
//! A host hands over a function name and positional string arguments. They
//! are resolved once, here, into an [`Operation`]; everything downstream
//! matches on the enum. Argument checks use `Validation` so a caller learns
//! about every problem with an invocation at once.

use crate::error::ContractError;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A resolved invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Create {
        chassis_no: String,
    },
    Transfer {
        chassis_no: String,
        new_owner: String,
    },
    SellAndRegister {
        chassis_no: String,
        new_owner: String,
        registration_no: String,
        registration_expiry: String,
    },
    Scrap {
        chassis_no: String,
    },
    Get {
        chassis_no: String,
    },
    History {
        chassis_no: String,
    },
}

/// Problems with the arguments of an invocation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ArgumentProblem {
    #[error("expected {expected} arguments, got {got}")]
    Arity { expected: usize, got: usize },

    #[error("argument {position} ({name}) is empty")]
    Empty { position: usize, name: &'static str },
}

type Check = Validation<(), NonEmptyVec<ArgumentProblem>>;

impl Operation {
    /// Function names accepted by [`Operation::parse`].
    pub const NAMES: [&'static str; 6] = [
        "createCar",
        "transferCar",
        "sellnRegisterCar",
        "scrapCar",
        "getCar",
        "getCarHistory",
    ];

    /// Resolve `function` and bind `args` positionally.
    ///
    /// ```
    /// use vlm::dispatch::Operation;
    ///
    /// let op = Operation::parse("transferCar", &["CH001".into(), "DealerA".into()]).unwrap();
    /// assert_eq!(op, Operation::Transfer { chassis_no: "CH001".into(), new_owner: "DealerA".into() });
    /// assert!(Operation::parse("stealCar", &[]).is_err());
    /// ```
    pub fn parse(function: &str, args: &[String]) -> Result<Self, ContractError> {
        let kind = Kind::from_name(function)
            .ok_or_else(|| ContractError::UnknownOperation(function.to_string()))?;

        if let Validation::Failure(problems) = check_args(kind.parameters(), args) {
            return Err(ContractError::InvalidArguments {
                function: function.to_string(),
                problems: problems.iter().map(ToString::to_string).collect(),
            });
        }

        let arg = |i: usize| args[i].clone();
        Ok(match kind {
            Kind::Create => Operation::Create { chassis_no: arg(0) },
            Kind::Transfer => Operation::Transfer {
                chassis_no: arg(0),
                new_owner: arg(1),
            },
            Kind::SellAndRegister => Operation::SellAndRegister {
                chassis_no: arg(0),
                new_owner: arg(1),
                registration_no: arg(2),
                registration_expiry: arg(3),
            },
            Kind::Scrap => Operation::Scrap { chassis_no: arg(0) },
            Kind::Get => Operation::Get { chassis_no: arg(0) },
            Kind::History => Operation::History { chassis_no: arg(0) },
        })
    }

    /// Function name this operation is invoked by.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Create { .. } => "createCar",
            Operation::Transfer { .. } => "transferCar",
            Operation::SellAndRegister { .. } => "sellnRegisterCar",
            Operation::Scrap { .. } => "scrapCar",
            Operation::Get { .. } => "getCar",
            Operation::History { .. } => "getCarHistory",
        }
    }

    pub fn chassis_no(&self) -> &str {
        match self {
            Operation::Create { chassis_no }
            | Operation::Transfer { chassis_no, .. }
            | Operation::SellAndRegister { chassis_no, .. }
            | Operation::Scrap { chassis_no }
            | Operation::Get { chassis_no }
            | Operation::History { chassis_no } => chassis_no,
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, Operation::Get { .. } | Operation::History { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Create,
    Transfer,
    SellAndRegister,
    Scrap,
    Get,
    History,
}

impl Kind {
    fn from_name(function: &str) -> Option<Self> {
        Some(match function {
            "createCar" => Kind::Create,
            "transferCar" => Kind::Transfer,
            "sellnRegisterCar" => Kind::SellAndRegister,
            "scrapCar" => Kind::Scrap,
            "getCar" => Kind::Get,
            "getCarHistory" => Kind::History,
            _ => return None,
        })
    }

    fn parameters(self) -> &'static [&'static str] {
        match self {
            Kind::Create | Kind::Scrap | Kind::Get | Kind::History => &["chassisNo"],
            Kind::Transfer => &["chassisNo", "owner"],
            Kind::SellAndRegister => &[
                "chassisNo",
                "owner",
                "registrationNo",
                "registrationExpiry",
            ],
        }
    }
}

fn check_args(params: &[&'static str], args: &[String]) -> Check {
    let mut checks: Vec<Check> = Vec::new();

    checks.push(if args.len() == params.len() {
        Validation::success(())
    } else {
        Validation::fail(ArgumentProblem::Arity {
            expected: params.len(),
            got: args.len(),
        })
    });

    checks.push(match args.first() {
        Some(chassis_no) if chassis_no.is_empty() => Validation::fail(ArgumentProblem::Empty {
            position: 0,
            name: params[0],
        }),
        _ => Validation::success(()),
    });

    Validation::all_vec(checks).map(|_| ())
}
