//! Solidity source rendering for token specs

use alloy::primitives::U256;
use std::str::FromStr;
use crate::{
    errors::{BotError, BotResult},
    token_gen::sanitize::DEFAULT_CAP,
    types::{TokenKind, TokenSpec},
};

const IDENT_FALLBACK: &str = "Token";

/// A rendered contract ready for compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSource {
    pub source: String,
    pub contract_name: String,
    pub display_name: String,
    pub initial_supply: U256,
}

/// CamelCase identifier built from the alphanumeric runs of `name`.
pub fn contract_identifier(name: &str) -> String {
    let camel: String = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
                None => String::new(),
            }
        })
        .collect();

    match camel.chars().next() {
        None => IDENT_FALLBACK.to_string(),
        Some(c) if c.is_ascii_digit() => format!("X{}", camel),
        Some(_) => camel,
    }
}

/// Escapes a value for use inside a Solidity string literal.
pub fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

fn parse_amount(field: &str, value: &str) -> BotResult<U256> {
    U256::from_str(value).map_err(|e| BotError::TokenGeneration(format!("{} {:?} is not a number: {}", field, value, e)))
}

const MINT_FN: &str = r#"
    function mint(address to, uint256 amount) public returns (bool) {
        totalSupply += amount;
        balanceOf[to] += amount;
        emit Transfer(address(0), to, amount);
        return true;
    }
"#;

fn capped_extension(cap: U256) -> String {
    format!(
        r#"
    uint256 public cap = {cap};

    function mint(address to, uint256 amount) public returns (bool) {{
        require(totalSupply + amount <= cap, "cap exceeded");
        totalSupply += amount;
        balanceOf[to] += amount;
        emit Transfer(address(0), to, amount);
        return true;
    }}

    function burn(uint256 amount) public returns (bool) {{
        require(balanceOf[msg.sender] >= amount, "insufficient");
        unchecked {{ balanceOf[msg.sender] -= amount; totalSupply -= amount; }}
        emit Transfer(msg.sender, address(0), amount);
        return true;
    }}
"#
    )
}

/// Renders the minimal ERC-20 for `spec`, with the mint / cap+burn
/// extensions its kind calls for.
pub fn render(spec: &TokenSpec, solc_version: &str) -> BotResult<ContractSource> {
    let params = &spec.params;
    let contract_name = contract_identifier(&params.name);
    let name = escape(&params.name);
    let symbol = escape(&params.symbol);
    let decimals = params.decimals.min(18);
    let initial_supply = parse_amount("initial_supply", &params.initial_supply)?;

    let extension = match spec.kind {
        TokenKind::FixedSupply => String::new(),
        TokenKind::Mintable => MINT_FN.to_string(),
        TokenKind::CappedBurnable => {
            let cap = parse_amount("cap", params.cap.as_deref().unwrap_or(DEFAULT_CAP))?;
            capped_extension(cap)
        }
    };

    let source = format!(
        r#"// SPDX-License-Identifier: MIT
pragma solidity {solc_version};

contract {contract_name} {{
    string public name = "{name}";
    string public symbol = "{symbol}";
    uint8  public decimals = {decimals};
    uint256 public totalSupply;
    mapping(address => uint256) public balanceOf;
    mapping(address => mapping(address => uint256)) public allowance;
    event Transfer(address indexed from, address indexed to, uint256 value);
    event Approval(address indexed owner, address indexed spender, uint256 value);

    constructor(uint256 initialSupply) {{
        totalSupply = initialSupply;
        balanceOf[msg.sender] = initialSupply;
        emit Transfer(address(0), msg.sender, initialSupply);
    }}

    function transfer(address to, uint256 value) public returns (bool) {{
        require(balanceOf[msg.sender] >= value, "insufficient");
        unchecked {{ balanceOf[msg.sender] -= value; }}
        balanceOf[to] += value;
        emit Transfer(msg.sender, to, value);
        return true;
    }}

    function approve(address spender, uint256 value) public returns (bool) {{
        allowance[msg.sender][spender] = value;
        emit Approval(msg.sender, spender, value);
        return true;
    }}

    function transferFrom(address from, address to, uint256 value) public returns (bool) {{
        require(balanceOf[from] >= value, "insufficient");
        require(allowance[from][msg.sender] >= value, "allowance");
        unchecked {{ allowance[from][msg.sender] -= value; balanceOf[from] -= value; }}
        balanceOf[to] += value;
        emit Transfer(from, to, value);
        return true;
    }}
{extension}}}
"#
    );

    Ok(ContractSource {
        source,
        contract_name,
        display_name: params.name.clone(),
        initial_supply,
    })
}
