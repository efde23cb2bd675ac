use devreg_assignment::{assign_device, release_device};
use devreg_domain::models::{Device, Holder, RegistryDocument, Usage, User};
use proptest::prelude::*;

const DEVICES: [&str; 4] = ["D1", "D2", "D3", "D4"];
const USERS: [&str; 3] = ["alice", "bob", "carol"];

#[derive(Debug, Clone)]
enum Op {
    Assign(usize, usize),
    Release(usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..DEVICES.len(), 0..USERS.len()).prop_map(|(d, u)| Op::Assign(d, u)),
        (0..DEVICES.len(), 0..USERS.len()).prop_map(|(d, u)| Op::Release(d, u)),
    ]
}

fn registry() -> RegistryDocument {
    RegistryDocument {
        devices: DEVICES.iter().map(|id| Device::new(*id, format!("{id}.jpg"))).collect(),
        users: USERS
            .iter()
            .map(|name| User { name: (*name).into(), login: (*name).into(), ..User::default() })
            .collect(),
        ..RegistryDocument::default()
    }
}

fn assert_consistent(doc: &RegistryDocument) {
    for device in &doc.devices {
        let holders: Vec<&User> = doc
            .users
            .iter()
            .filter(|user| user.devices.iter().any(|entry| entry.identifier == device.identifier))
            .collect();

        match device.usage {
            Usage::InUse => {
                assert_eq!(holders.len(), 1, "{} must be listed exactly once", device.identifier);
                assert_eq!(device.user, Holder::User(holders[0].name.clone()));
            },
            Usage::Free | Usage::Other(_) => {
                assert!(holders.is_empty(), "{} is free but listed", device.identifier);
                assert_eq!(device.user, Holder::Available);
            },
        }
    }

    for user in &doc.users {
        assert!(user.devices.iter().all(|entry| entry.usage == Usage::InUse));
    }
}

proptest! {
    #[test]
    fn assign_and_release_keep_registry_consistent(ops in prop::collection::vec(op(), 0..64)) {
        let mut doc = registry();

        for op in ops {
            let before = doc.clone();
            let result = match op {
                Op::Assign(d, u) => assign_device(&mut doc, DEVICES[d], USERS[u]).map(drop),
                Op::Release(d, u) => release_device(&mut doc, DEVICES[d], USERS[u]).map(drop),
            };
            if result.is_err() {
                prop_assert_eq!(&doc, &before);
            }
            assert_consistent(&doc);
        }
    }
}
