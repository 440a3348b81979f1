use std::sync::Arc;

use libcsi::{
    AccessMode, Code, ControllerCapabilityKind, ControllerRequest, CsiController, CsiDriver,
    CsiError, CsiIdentity, CsiNode, DefaultControllerServer, DefaultIdentityServer,
    DefaultNodeServer, DriverConfig, NodeCapabilityKind,
};

fn fake_driver() -> CsiDriver {
    CsiDriver::new("fake", "0.3.0", "fakeNodeID").expect("valid driver")
}

#[test]
fn construction_requires_name_and_node_id() {
    for version in ["", "0.3.0"] {
        assert_eq!(
            CsiDriver::new("", version, "n"),
            Err(CsiError::MissingDriverName)
        );
        assert_eq!(
            CsiDriver::new("name", version, ""),
            Err(CsiError::MissingNodeId)
        );
        assert!(CsiDriver::new("", version, "").is_err());
    }
}

#[test]
fn fake_driver_advertises_node_expansion() {
    let mut driver = fake_driver();
    driver.add_node_service_capabilities([NodeCapabilityKind::ExpandVolume]);

    let caps = driver.node_service_capabilities();
    assert_eq!(caps.len(), 1);
    assert_eq!(caps[0].kind(), NodeCapabilityKind::ExpandVolume);
}

#[tokio::test]
async fn services_share_one_registry() {
    let cfg = DriverConfig {
        name: "fake".into(),
        version: "0.3.0".into(),
        node_id: "fakeNodeID".into(),
        max_volumes_per_node: 4,
    };
    let mut driver = cfg.build().expect("valid driver");
    driver.add_controller_service_capabilities([
        ControllerCapabilityKind::CreateDeleteVolume,
        ControllerCapabilityKind::PublishUnpublishVolume,
        ControllerCapabilityKind::GetCapacity,
        ControllerCapabilityKind::ListVolumes,
    ]);
    driver.add_node_service_capabilities([NodeCapabilityKind::StageUnstageVolume]);
    driver.add_volume_capability_access_modes([AccessMode::SingleNodeWriter]);
    let driver = Arc::new(driver);

    let identity = DefaultIdentityServer::new(Arc::clone(&driver));
    let controller = DefaultControllerServer::new(Arc::clone(&driver));
    let node = DefaultNodeServer::new(Arc::clone(&driver), cfg.max_volumes_per_node);

    let info = identity.get_plugin_info().await.expect("plugin info");
    assert_eq!(info.name, "fake");
    assert_eq!(info.vendor_version, "0.3.0");

    assert_eq!(controller.get_capabilities().await.expect("caps").len(), 4);
    assert_eq!(node.get_capabilities().await.expect("caps").len(), 1);
    assert_eq!(node.get_info().await.expect("info").max_volumes, 4);

    // Declared, so the request reaches the (unimplemented) handler.
    let err = controller.get_capacity().await.unwrap_err();
    assert_eq!(err.code(), Code::Unimplemented);

    // Not declared, so the gate rejects it first.
    let err = controller
        .validate(ControllerRequest::ControllerExpandVolume)
        .unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);
}

#[test]
fn wire_values_are_gated() {
    let mut driver = fake_driver();
    driver.add_controller_service_capabilities([ControllerCapabilityKind::ListVolumes]);

    let validate = |raw: i32| {
        ControllerCapabilityKind::try_from(raw)
            .and_then(|kind| driver.validate_controller_request(kind))
    };

    assert_eq!(validate(0), Ok(()));
    assert_eq!(validate(ControllerCapabilityKind::ListVolumes as i32), Ok(()));
    for raw in [ControllerCapabilityKind::GetCapacity as i32, 13, 99, -1] {
        assert_eq!(validate(raw).unwrap_err().code(), Code::InvalidArgument, "{raw}");
    }
}

#[tokio::test]
async fn concurrent_validation() {
    let mut driver = fake_driver();
    driver.add_controller_service_capabilities([ControllerCapabilityKind::ListVolumes]);
    let driver = Arc::new(driver);

    let mut handles = Vec::new();
    for i in 0..16 {
        let driver = Arc::clone(&driver);
        handles.push(tokio::spawn(async move {
            let kind = if i % 2 == 0 {
                ControllerCapabilityKind::ListVolumes
            } else {
                ControllerCapabilityKind::GetCapacity
            };
            (i, driver.validate_controller_request(kind))
        }));
    }

    for handle in handles {
        let (i, result) = handle.await.expect("task");
        if i % 2 == 0 {
            assert!(result.is_ok());
        } else {
            assert_eq!(result.unwrap_err().code(), Code::InvalidArgument);
        }
    }
}
