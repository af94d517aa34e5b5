// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! REST client for the device control API.
//!
//! All endpoints live under `http://<device-ip>/api/v1`:
//!
//! | Method | Path | Client method |
//! |---|---|---|
//! | GET | `/info` | [`RestClient::device_info`], [`RestClient::is_online`] |
//! | GET/POST | `/settings` | [`RestClient::get_settings`], [`RestClient::set_setting`] |
//! | GET | `/scan` | [`RestClient::get_access_points`] |
//! | POST | `/connect` | [`RestClient::connect_to_access_point`] |
//! | GET | `/sensors` | [`RestClient::get_sensor_data`] |
//! | GET | `/meas` | [`RestClient::get_past_measurements`] |
//! | GET | `/actions`, `/actions/{c}` | [`RestClient::get_all_actions`], [`RestClient::get_component_actions`] |
//! | GET/POST | `/action/{c}/{a}` | [`RestClient::get_specific_action`], [`RestClient::set_specific_action`] |

mod body;
mod client;
mod config;
mod models;

pub use body::{ActionTarget, RequestBody};
pub use client::RestClient;
pub use config::RestConfig;
pub use models::{AccessPoint, DeviceInfo, NetworkConfig};
