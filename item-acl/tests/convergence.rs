// SPDX-License-Identifier: MIT OR Apache-2.0

use item_acl::test_utils::{
    DOCUMENTS, TASKS, TestSite, assignment, jane, max, owners, setup_logging, visitors,
};
use item_acl::{
    Config, ItemEvent, ItemEventReceiver, ItemFields, ItemKind, ItemNotification, ItemRef, ListId,
    MemoryStore, Outcome, RoleAssignment, RoleType,
};

fn receiver(site: &TestSite) -> ItemEventReceiver<MemoryStore> {
    let config = Config::default()
        .bind(&ListId::new(DOCUMENTS), ItemKind::DocumentRecord)
        .bind(&ListId::new(TASKS), ItemKind::TaskRecord);
    ItemEventReceiver::new(site.store.clone(), config)
}

fn write(
    receiver: &ItemEventReceiver<MemoryStore>,
    event: ItemEvent,
    item: &ItemRef,
    fields: &[(&str, &str)],
) -> Outcome {
    let fields = fields
        .iter()
        .fold(ItemFields::new(), |fields, (name, value)| {
            fields.with(name, value)
        });

    receiver.on_item_written(&ItemNotification {
        event,
        item: item.clone(),
        fields,
    })
}

#[test]
fn document_lifecycle() {
    setup_logging();

    let site = TestSite::new();
    let receiver = receiver(&site);
    let item = site.document(1);

    // Created without a responsible principal: only the owners' full control survives.
    assert_eq!(write(&receiver, ItemEvent::Added, &item, &[]), Outcome::Applied);
    assert_eq!(
        site.assignments(&item),
        vec![assignment(&owners(), &[RoleType::Administrator])]
    );
    let version = site.store.item_state(&item).unwrap().version;

    // Jane becomes responsible.
    let fields = [("OrganizationalIDNumber", "42")];
    assert_eq!(
        write(&receiver, ItemEvent::Updated, &item, &fields),
        Outcome::Applied
    );
    assert_eq!(
        site.assignments(&item),
        vec![
            assignment(&jane(), &[RoleType::Contributor]),
            assignment(&owners(), &[RoleType::Administrator]),
        ]
    );

    // Saving again changes nothing.
    let converged = site.store.item_state(&item).unwrap();
    assert_eq!(converged.version, version + 1);
    assert_eq!(
        write(&receiver, ItemEvent::Updated, &item, &fields),
        Outcome::Applied
    );
    assert_eq!(site.store.item_state(&item).unwrap(), converged);

    // Handing the document over to Max drops Jane's baseline grant.
    assert_eq!(
        write(
            &receiver,
            ItemEvent::Updated,
            &item,
            &[("OrganizationalIDNumber", "7")]
        ),
        Outcome::Applied
    );
    assert_eq!(
        site.assignments(&item),
        vec![
            assignment(&max(), &[RoleType::Contributor]),
            assignment(&owners(), &[RoleType::Administrator]),
        ]
    );
}

#[test]
fn high_grants_of_any_principal_are_preserved() {
    let site = TestSite::new();
    let receiver = receiver(&site);
    let item = site.task(1);

    let designer: RoleAssignment = assignment(&max(), &[RoleType::WebDesigner]);
    let admin = assignment(&owners(), &[RoleType::Reader, RoleType::Administrator]);
    site.set_assignments(
        &item,
        vec![
            designer.clone(),
            admin.clone(),
            assignment(&visitors(), &[RoleType::Contributor]),
        ],
    );

    assert_eq!(
        write(
            &receiver,
            ItemEvent::Updated,
            &item,
            &[("AssignedTo", "Jane Doe")]
        ),
        Outcome::Applied
    );

    assert_eq!(
        site.assignments(&item),
        vec![
            designer,
            assignment(&jane(), &[RoleType::Contributor]),
            admin,
        ]
    );
}

#[test]
fn designated_web_designer_is_not_downgraded() {
    let site = TestSite::new();
    let receiver = receiver(&site);
    let item = site.task(2);
    site.set_assignments(&item, vec![assignment(&jane(), &[RoleType::WebDesigner])]);

    assert_eq!(
        write(
            &receiver,
            ItemEvent::Added,
            &item,
            &[("AssignedTo", "42;#Jane Doe")]
        ),
        Outcome::Applied
    );
    assert_eq!(
        site.assignments(&item),
        vec![assignment(&jane(), &[RoleType::WebDesigner])]
    );
    assert_eq!(site.store.item_state(&item).unwrap().version, 0);
}

#[test]
fn failed_writes_leave_item_untouched() {
    let site = TestSite::new();
    let receiver = receiver(&site);
    let item = site.task(3);
    let before = site.store.item_state(&item).unwrap();

    let outcome = write(&receiver, ItemEvent::Added, &item, &[("AssignedTo", "12;#Gone")]);
    assert_eq!(
        outcome,
        Outcome::Cancelled {
            message: "user 12 cannot be found".into()
        }
    );
    assert_eq!(site.store.item_state(&item).unwrap(), before);
}
