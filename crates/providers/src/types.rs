use serde::{Deserialize, Serialize};

/// Token parameters extracted from a launch prompt by the backend.
///
/// `max_supply` is carried for display and echoed back to the deploy
/// endpoint; nothing in the launch flow depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    #[serde(deserialize_with = "supply::required")]
    pub initial_supply: u64,
    #[serde(
        default,
        deserialize_with = "supply::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_supply: Option<u64>,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
    pub contract_address: String,
    pub to: String,
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PromptBody<'a> {
    pub prompt: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AnnouncementBody<'a> {
    pub content: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SentimentResponse {
    pub sentiment: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AgentListResponse {
    #[serde(default)]
    pub agents: Vec<String>,
}

/// Raw reply of the agent chat endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub result: serde_json::Value,
    #[serde(default)]
    pub tx_url: Option<String>,
}

impl ChatResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Supply amounts arrive as integers, floats or numeric strings depending on
/// how the backend's model phrased them. Fractions are floored.
mod supply {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn required<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        parse(&value).map_err(D::Error::custom)
    }

    pub fn optional<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            value => parse(&value).map(Some).map_err(D::Error::custom),
        }
    }

    fn parse(value: &Value) -> Result<u64, String> {
        match value {
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    return Ok(v);
                }
                n.as_f64()
                    .and_then(from_float)
                    .ok_or_else(|| format!("invalid supply: {}", n))
            }
            Value::String(s) => {
                let cleaned: String = s
                    .trim()
                    .chars()
                    .filter(|c| *c != ',' && *c != '_')
                    .collect();
                if let Ok(v) = cleaned.parse::<u64>() {
                    return Ok(v);
                }
                cleaned
                    .parse::<f64>()
                    .ok()
                    .and_then(from_float)
                    .ok_or_else(|| format!("invalid supply: {:?}", s))
            }
            other => Err(format!("invalid supply: {}", other)),
        }
    }

    fn from_float(v: f64) -> Option<u64> {
        if v.is_finite() && v >= 0.0 && v < u64::MAX as f64 {
            Some(v.floor() as u64)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_info_camel_case() {
        let info: TokenInfo = serde_json::from_value(json!({
            "name": "Rocket",
            "symbol": "RKT",
            "initialSupply": 100000,
            "maxSupply": 1000000,
            "owner": "0xOwner"
        }))
        .unwrap();

        assert_eq!(info.initial_supply, 100_000);
        assert_eq!(info.max_supply, Some(1_000_000));
    }

    #[test]
    fn test_token_info_lenient_supply() {
        let info: TokenInfo = serde_json::from_value(json!({
            "name": "Rocket",
            "symbol": "RKT",
            "initialSupply": "100,000",
            "maxSupply": null,
            "owner": "0xOwner"
        }))
        .unwrap();
        assert_eq!(info.initial_supply, 100_000);
        assert_eq!(info.max_supply, None);

        let info: TokenInfo = serde_json::from_value(json!({
            "name": "Odd",
            "symbol": "ODD",
            "initialSupply": 3.9,
            "owner": "0xOwner"
        }))
        .unwrap();
        assert_eq!(info.initial_supply, 3);
    }

    #[test]
    fn test_token_info_rejects_negative_supply() {
        let result: Result<TokenInfo, _> = serde_json::from_value(json!({
            "name": "Bad",
            "symbol": "BAD",
            "initialSupply": -5,
            "owner": "0xOwner"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_max_supply_omitted_when_serializing() {
        let info = TokenInfo {
            name: "Rocket".to_string(),
            symbol: "RKT".to_string(),
            initial_supply: 10,
            max_supply: None,
            owner: "0xOwner".to_string(),
        };
        let value = serde_json::to_value(&info).unwrap();
        assert!(value.get("maxSupply").is_none());
        assert_eq!(value["initialSupply"], 10);
    }

    #[test]
    fn test_mint_request_wire_names() {
        let request = MintRequest {
            contract_address: "0xABC".to_string(),
            to: "0xOwner".to_string(),
            amount: 50_000,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"contractAddress": "0xABC", "to": "0xOwner", "amount": 50000})
        );
    }
}
