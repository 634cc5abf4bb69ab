use serde::{Deserialize, Serialize};

/// 统一响应结构，成功与失败共用
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub http_status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            http_status: 200,
            code: None,
            message: None,
            data: Some(data),
            trace_id: None,
        }
    }

    pub fn error(http_status: u16, code: Option<&str>, message: String) -> Self {
        Self {
            http_status,
            code: code.map(str::to_string),
            message: Some(message),
            data: None,
            trace_id: None,
        }
    }

    pub fn with_trace_id(mut self, trace_id: &str) -> Self {
        self.trace_id = Some(trace_id.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_omits_absent_fields() {
        let body = ApiResponse::<()>::error(500, None, "Internal Server Error".into());
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"http_status": 500, "message": "Internal Server Error"})
        );
    }

    #[test]
    fn success_envelope_carries_data() {
        let body = ApiResponse::success(vec!["a", "b"]);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["http_status"], 200);
        assert_eq!(json["data"], serde_json::json!(["a", "b"]));
        assert!(json.get("code").is_none());
    }
}
