//! Greeter ABI and method registry
//!
//! The `sol!` block below is the single source of truth for selectors,
//! argument order and return types. Everything else in the bindings is
//! derived from it.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_sol_types::{sol, SolCall};
use anyhow::{bail, Context, Result};
use serde::Serialize;

sol! {
    #[sol(all_derives)]
    interface IGreeter {
        event Greeted(address indexed from, string message);
        event Locked(string message);

        error InsufficientBalance();
        error TransferFailed();

        function getBalance() external view returns (uint128);
        function greet() external view returns (string);
        function setMessage(string newMessage, uint128 value) external payable;
        function getLockState() external view returns (bool);
        function unlock(uint128 value) external payable;
    }
}

/// A method parameter specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    /// Parameter name as declared in the ABI
    pub name: &'static str,
    /// Solidity type (e.g., "string", "uint128")
    pub kind: &'static str,
}

/// Static metadata for one contract method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MethodSpec {
    /// ABI method name (e.g., "setMessage")
    pub name: &'static str,
    /// 4-byte selector
    pub selector: [u8; 4],
    /// Canonical signature (e.g., "setMessage(string,uint128)")
    pub signature: &'static str,
    /// Inputs in declaration order
    pub inputs: &'static [ParamSpec],
    /// Whether the method accepts attached value
    pub payable: bool,
}

pub const GET_BALANCE: MethodSpec = MethodSpec {
    name: "getBalance",
    selector: IGreeter::getBalanceCall::SELECTOR,
    signature: IGreeter::getBalanceCall::SIGNATURE,
    inputs: &[],
    payable: false,
};

pub const GREET: MethodSpec = MethodSpec {
    name: "greet",
    selector: IGreeter::greetCall::SELECTOR,
    signature: IGreeter::greetCall::SIGNATURE,
    inputs: &[],
    payable: false,
};

pub const SET_MESSAGE: MethodSpec = MethodSpec {
    name: "setMessage",
    selector: IGreeter::setMessageCall::SELECTOR,
    signature: IGreeter::setMessageCall::SIGNATURE,
    inputs: &[
        ParamSpec {
            name: "newMessage",
            kind: "string",
        },
        ParamSpec {
            name: "value",
            kind: "uint128",
        },
    ],
    payable: true,
};

pub const GET_LOCK_STATE: MethodSpec = MethodSpec {
    name: "getLockState",
    selector: IGreeter::getLockStateCall::SELECTOR,
    signature: IGreeter::getLockStateCall::SIGNATURE,
    inputs: &[],
    payable: false,
};

pub const UNLOCK: MethodSpec = MethodSpec {
    name: "unlock",
    selector: IGreeter::unlockCall::SELECTOR,
    signature: IGreeter::unlockCall::SIGNATURE,
    inputs: &[ParamSpec {
        name: "value",
        kind: "uint128",
    }],
    payable: true,
};

/// All methods in ABI declaration order
pub const METHODS: [MethodSpec; 5] = [GET_BALANCE, GREET, SET_MESSAGE, GET_LOCK_STATE, UNLOCK];

/// Look up a method by selector
pub fn method_by_selector(selector: [u8; 4]) -> Option<&'static MethodSpec> {
    METHODS.iter().find(|method| method.selector == selector)
}

/// A decoded method argument, used for logs and previews
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedArg {
    pub name: String,
    pub kind: String,
    pub value: String,
}

/// Decode calldata back into its method and arguments (in declaration order).
pub fn decode_arguments(calldata: &[u8]) -> Result<(&'static MethodSpec, Vec<DecodedArg>)> {
    if calldata.len() < 4 {
        bail!("calldata too short (need at least 4 bytes for selector)");
    }
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&calldata[..4]);
    let Some(method) = method_by_selector(selector) else {
        bail!("unknown selector 0x{}", hex::encode(selector));
    };

    if method.inputs.is_empty() {
        return Ok((method, Vec::new()));
    }

    let types: Vec<DynSolType> = method
        .inputs
        .iter()
        .map(|param| {
            param.kind.parse::<DynSolType>().with_context(|| {
                format!("Failed to parse type '{}' for param '{}'", param.kind, param.name)
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let decoded = DynSolType::Tuple(types)
        .abi_decode_params(&calldata[4..])
        .context("Failed to decode calldata")?;
    let values = match decoded {
        DynSolValue::Tuple(values) => values,
        other => vec![other],
    };

    let args = method
        .inputs
        .iter()
        .zip(values.iter())
        .map(|(param, value)| DecodedArg {
            name: param.name.to_string(),
            kind: param.kind.to_string(),
            value: format_value(value),
        })
        .collect();

    Ok((method, args))
}

fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::String(s) => format!("{s:?}"),
        DynSolValue::Uint(v, _) => v.to_string(),
        DynSolValue::Int(v, _) => v.to_string(),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Address(a) => a.to_checksum(None),
        other => format!("{other:?}"),
    }
}
