// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the REST client using wiremock.

#![cfg(feature = "http")]

use std::time::Duration;

use mystrom_lib::rest::{AccessPoint, ActionTarget, NetworkConfig, RequestBody, RestClient};
use mystrom_lib::{DecodeError, Error, RequestFailure};
use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> RestClient {
    RestClient::new(server.uri()).unwrap()
}

fn button_plus_info() -> serde_json::Value {
    json!({
        "type": 118,
        "mac": "A4CF12F0E5D6",
        "ip": "192.168.1.10",
        "version": "2.74.31",
        "connected": true
    })
}

// ============================================================================
// Device information
// ============================================================================

mod info {
    use super::*;

    #[tokio::test]
    async fn device_info_decodes_known_and_extra_fields() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(button_plus_info()))
            .mount(&server)
            .await;

        let info = client_for(&server).device_info().await.unwrap();

        assert_eq!(info.device_type, 118);
        assert_eq!(info.mac, "A4CF12F0E5D6");
        assert_eq!(info.ip, "192.168.1.10");
        assert_eq!(info.extra["version"], "2.74.31");
        assert!(info.is_button_plus());
    }

    #[tokio::test]
    async fn device_info_with_invalid_json_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/info"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).device_info().await.unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::Json(_))));
    }

    #[tokio::test]
    async fn server_error_carries_method_and_path() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/settings"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server).get_settings().await.unwrap_err();
        let request = match err {
            Error::Request(request) => request,
            other => panic!("expected request error, got {other:?}"),
        };

        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/settings");
        assert!(matches!(request.kind, RequestFailure::Status(500)));
        assert_eq!(request.to_string(), "GET /settings failed: HTTP status 500");
    }
}

// ============================================================================
// Reachability
// ============================================================================

mod online {
    use super::*;

    #[tokio::test]
    async fn answering_device_is_online() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(button_plus_info()))
            .mount(&server)
            .await;

        assert!(client_for(&server).is_online().await);
    }

    #[tokio::test]
    async fn error_status_still_counts_as_online() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/info"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(client_for(&server).is_online().await);
    }

    #[tokio::test]
    async fn unreachable_device_is_offline() {
        let client = RestClient::new("127.0.0.1:1").unwrap();
        assert!(!client.is_online().await);
    }

    #[tokio::test]
    async fn slow_device_is_offline_after_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/info"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(button_plus_info())
                    .set_delay(Duration::from_secs(8)),
            )
            .mount(&server)
            .await;

        let started = std::time::Instant::now();
        assert!(!client_for(&server).is_online().await);
        assert!(started.elapsed() < Duration::from_secs(7));
    }

    #[tokio::test]
    async fn probe_accepts_button_plus() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(button_plus_info()))
            .mount(&server)
            .await;

        let info = client_for(&server).probe().await.unwrap();
        assert_eq!(info.map(|i| i.mac).as_deref(), Some("A4CF12F0E5D6"));
    }

    #[tokio::test]
    async fn probe_rejects_other_products() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": 107,
                "mac": "A4CF12000001",
                "ip": "192.168.1.11"
            })))
            .mount(&server)
            .await;

        assert!(client_for(&server).probe().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn probe_of_offline_device_is_none() {
        let client = RestClient::new("127.0.0.1:1").unwrap();
        assert!(client.probe().await.unwrap().is_none());
    }
}

// ============================================================================
// Wireless networks
// ============================================================================

mod wifi {
    use super::*;

    #[tokio::test]
    async fn scan_pairs_entries_and_drops_empty_ssids() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/scan"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["A", 10, "", 5, "B", 7])))
            .mount(&server)
            .await;

        let access_points = client_for(&server).get_access_points().await.unwrap();

        assert_eq!(
            access_points,
            vec![
                AccessPoint {
                    ssid: "A".to_string(),
                    strength: 10
                },
                AccessPoint {
                    ssid: "B".to_string(),
                    strength: 7
                },
            ]
        );
    }

    #[tokio::test]
    async fn scan_with_odd_length_is_unexpected_format() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/scan"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["A", 10, "B"])))
            .mount(&server)
            .await;

        let err = client_for(&server).get_access_points().await.unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::UnexpectedFormat(_))));
    }

    #[tokio::test]
    async fn connect_renames_network_fields() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/connect"))
            .and(body_json(json!({
                "ssid": "home",
                "passwd": "secret",
                "ip": "192.168.1.50",
                "mask": "255.255.255.0",
                "gw": "192.168.1.1",
                "dns": "192.168.1.1"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let ifconfig = NetworkConfig {
            ip: "192.168.1.50".to_string(),
            netmask: "255.255.255.0".to_string(),
            gateway: "192.168.1.1".to_string(),
            dns: "192.168.1.1".to_string(),
        };

        client_for(&server)
            .connect_to_access_point("home", "secret", &ifconfig)
            .await
            .unwrap();
    }
}

// ============================================================================
// Settings, sensors and actions
// ============================================================================

mod actions {
    use super::*;

    #[tokio::test]
    async fn set_specific_action_sends_method_scheme_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/action/generic/generic"))
            .and(body_string("post://10.0.0.5/hook"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .set_specific_action("generic", "generic", &ActionTarget::post("http://10.0.0.5/hook"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn register_webhook_targets_catch_all_action() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/action/generic/generic"))
            .and(body_string("post://192.168.1.2:8123/api/webhook/abc"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .register_webhook("https://192.168.1.2:8123/api/webhook/abc")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn specific_action_is_fetched_per_component() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/action/1/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "url": "get://192.168.1.2/double"
            })))
            .mount(&server)
            .await;

        let action = client_for(&server).get_specific_action("1", "2").await.unwrap();
        assert_eq!(action["url"], "get://192.168.1.2/double");
    }

    #[tokio::test]
    async fn component_actions_and_all_actions() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/actions/generic"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"generic": ""})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/actions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"1": {}, "2": {}})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let component = client.get_component_actions("generic").await.unwrap();
        let all = client.get_all_actions().await.unwrap();

        assert!(component.get("generic").is_some());
        assert_eq!(all.as_object().map(serde_json::Map::len), Some(2));
    }

    #[tokio::test]
    async fn sensors_and_measurements() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/sensors"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"temperature": 21.5, "humidity": 44})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/meas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"temperature": [21.0, 21.5]})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let sensors = client.get_sensor_data().await.unwrap();
        let past = client.get_past_measurements().await.unwrap();

        assert_eq!(sensors["temperature"], 21.5);
        assert_eq!(past["temperature"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn set_setting_posts_json() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/settings"))
            .and(body_json(json!({"name": "Hall"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Hall"})))
            .expect(1)
            .mount(&server)
            .await;

        let answer = client_for(&server)
            .set_setting(&json!({"name": "Hall"}))
            .await
            .unwrap();
        assert_eq!(answer["name"], "Hall");
    }

    #[tokio::test]
    async fn raw_request_body_is_plain_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/action/1/1"))
            .and(header("content-type", "text/plain; charset=utf-8"))
            .and(body_string("get://10.0.0.9/toggle"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let body = RequestBody::from_parts(Some("get://10.0.0.9/toggle".to_string()), None);
        let text = client_for(&server)
            .request(Method::POST, "/action/1/1", body)
            .await
            .unwrap();
        assert_eq!(text, "ok");
    }
}
