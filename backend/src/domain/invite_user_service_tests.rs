//! Tests for the organization invitation service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::service_test_doubles::{StubFailure, StubFind, StubPersist};
use crate::domain::{
    BelongingOrganization, DisplayName, InvitingUnknownUser, OrganizationMember, Role,
};

struct World {
    organization: Organization,
    inviter: User,
}

struct Harness {
    find_user_by_id: Arc<StubFind<User>>,
    find_user_by_email: Arc<StubFind<User>>,
    find_organization: Arc<StubFind<Organization>>,
    persist: Arc<StubPersist<OrganizationWithInvitation>>,
}

impl Harness {
    fn new(
        inviter: StubFind<User>,
        invitee: StubFind<User>,
        organization: StubFind<Organization>,
        persist: StubPersist<OrganizationWithInvitation>,
    ) -> Self {
        Self {
            find_user_by_id: Arc::new(inviter),
            find_user_by_email: Arc::new(invitee),
            find_organization: Arc::new(organization),
            persist: Arc::new(persist),
        }
    }

    fn found(world: &World, invitee: Option<User>) -> Self {
        Self::new(
            StubFind::returning(Some(world.inviter.clone())),
            StubFind::returning(invitee),
            StubFind::returning(Some(world.organization.clone())),
            StubPersist::succeeding(),
        )
    }

    fn service(&self) -> InviteUserService {
        InviteUserService::new(
            self.find_user_by_id.clone(),
            self.find_user_by_email.clone(),
            self.find_organization.clone(),
            self.persist.clone(),
        )
    }
}

fn email(raw: &str) -> Email {
    Email::new(raw).expect("valid email")
}

fn user(raw_email: &str, memberships: Vec<BelongingOrganization>) -> User {
    User::new(UserId::generate(), email(raw_email), None, memberships)
}

#[fixture]
fn world() -> World {
    let organization_id = OrganizationId::generate();
    let inviter = user(
        "admin@example.com",
        vec![BelongingOrganization::with_role(organization_id, Role::admin())],
    );
    let organization = Organization::new(
        organization_id,
        DisplayName::new("Acme").expect("valid name"),
        vec![OrganizationMember {
            id: *inviter.id(),
            email: inviter.email().clone(),
            display_name: None,
            role: Role::admin(),
        }],
        vec![InvitingUnknownUser {
            email: email("pending@example.com"),
            role: Role::member(),
        }],
    );
    World {
        organization,
        inviter,
    }
}

fn command(world: &World, invitee: &str, role: &str) -> InviteUserCommand {
    InviteUserCommand::parse(
        &world.organization.id().to_string(),
        role,
        invitee,
        &world.inviter.id().to_string(),
    )
    .expect("valid command")
}

#[rstest]
#[tokio::test]
async fn unknown_email_receives_pending_invitation(world: World) {
    let harness = Harness::found(&world, None);

    let organization_id = harness
        .service()
        .invite_user(command(&world, "b@x.com", "member"), &())
        .await
        .expect("invitation succeeds");

    assert_eq!(&organization_id, world.organization.id());
    let persisted = harness.persist.persisted();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].entity, world.organization);
    assert_eq!(persisted[0].event.invitee_email, email("b@x.com"));
    assert_eq!(persisted[0].event.invitee_role, Role::member());
    assert_eq!(&persisted[0].event.inviter_user_id, world.inviter.id());
}

#[rstest]
#[tokio::test]
async fn registered_email_joins_organization(world: World) {
    let invitee = user("b@x.com", Vec::new());
    let harness = Harness::found(&world, Some(invitee.clone()));

    harness
        .service()
        .invite_user(command(&world, "b@x.com", "member"), &())
        .await
        .expect("invitation succeeds");

    let persisted = harness.persist.persisted();
    let joined = persisted[0]
        .entity
        .users()
        .iter()
        .find(|member| &member.id == invitee.id())
        .expect("invitee added to users");
    assert_eq!(joined.role, Role::member());
    assert_eq!(joined.email, email("b@x.com"));
}

#[rstest]
#[tokio::test]
async fn fetches_use_command_keys(world: World) {
    let harness = Harness::found(&world, None);

    harness
        .service()
        .invite_user(command(&world, "b@x.com", "member"), &())
        .await
        .expect("invitation succeeds");

    assert_eq!(harness.find_user_by_id.keys(), vec![world.inviter.id().to_string()]);
    assert_eq!(harness.find_user_by_email.keys(), vec!["b@x.com".to_owned()]);
    assert_eq!(
        harness.find_organization.keys(),
        vec![world.organization.id().to_string()]
    );
}

#[rstest]
#[tokio::test]
async fn unauthorized_inviter_is_refused_without_writes(world: World) {
    let weak_inviter = user(
        "weak@example.com",
        vec![BelongingOrganization::with_role(
            *world.organization.id(),
            Role::member(),
        )],
    );
    let harness = Harness::new(
        StubFind::returning(Some(weak_inviter)),
        StubFind::empty(),
        StubFind::returning(Some(world.organization.clone())),
        StubPersist::succeeding(),
    );

    let err = harness
        .service()
        .invite_user(command(&world, "b@x.com", "member"), &())
        .await
        .expect_err("refused");

    assert!(err.is_authorization());
    assert!(harness.persist.persisted().is_empty());
}

#[rstest]
#[case("admin@example.com")]
#[case("pending@example.com")]
#[tokio::test]
async fn duplicate_unknown_invitations_are_refused(world: World, #[case] invitee: &str) {
    let harness = Harness::found(&world, None);

    let err = harness
        .service()
        .invite_user(command(&world, invitee, "member"), &())
        .await
        .expect_err("duplicate");

    assert!(err.is_duplication());
    assert!(harness.persist.persisted().is_empty());
}

#[rstest]
#[tokio::test]
async fn existing_member_cannot_be_invited_again(world: World) {
    let harness = Harness::found(&world, Some(world.inviter.clone()));

    let err = harness
        .service()
        .invite_user(command(&world, "admin@example.com", "member"), &())
        .await
        .expect_err("duplicate");

    assert!(err.is_duplication());
}

#[rstest]
#[tokio::test]
async fn missing_inviter_is_unknown(world: World) {
    let harness = Harness::new(
        StubFind::empty(),
        StubFind::empty(),
        StubFind::returning(Some(world.organization.clone())),
        StubPersist::succeeding(),
    );

    let err = harness
        .service()
        .invite_user(command(&world, "b@x.com", "member"), &())
        .await
        .expect_err("inviter missing");

    assert!(err.is_unknown());
    assert!(err.to_string().contains("inviter"));
}

#[rstest]
#[tokio::test]
async fn missing_organization_is_unknown(world: World) {
    let harness = Harness::new(
        StubFind::returning(Some(world.inviter.clone())),
        StubFind::empty(),
        StubFind::empty(),
        StubPersist::succeeding(),
    );

    let err = harness
        .service()
        .invite_user(command(&world, "b@x.com", "member"), &())
        .await
        .expect_err("organization missing");

    assert!(err.is_unknown());
    assert!(err.to_string().contains("organization"));
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum FailingFetch {
    Inviter,
    Invitee,
    Organization,
}

#[rstest]
#[case(FailingFetch::Inviter, StubFailure::Io)]
#[case(FailingFetch::Invitee, StubFailure::DataConsistency)]
#[case(FailingFetch::Organization, StubFailure::Unexpected)]
#[tokio::test]
async fn any_fetch_failure_is_a_repository_error(
    world: World,
    #[case] failing: FailingFetch,
    #[case] failure: StubFailure,
) {
    let stub_for = |slot: FailingFetch, found: Option<User>| {
        if slot == failing {
            StubFind::failing(failure)
        } else {
            StubFind::returning(found)
        }
    };
    let organization = match failing {
        FailingFetch::Organization => StubFind::failing(failure),
        _ => StubFind::returning(Some(world.organization.clone())),
    };
    let harness = Harness::new(
        stub_for(FailingFetch::Inviter, Some(world.inviter.clone())),
        stub_for(FailingFetch::Invitee, None),
        organization,
        StubPersist::succeeding(),
    );

    let err = harness
        .service()
        .invite_user(command(&world, "b@x.com", "member"), &())
        .await
        .expect_err("fetch fails");

    assert!(err.is_repository());
    assert_eq!(harness.find_user_by_id.calls(), 1);
    assert_eq!(harness.find_user_by_email.calls(), 1);
    assert_eq!(harness.find_organization.calls(), 1);
    assert!(harness.persist.persisted().is_empty());
}

#[rstest]
#[case(StubFailure::Io, true)]
#[case(StubFailure::DataConsistency, false)]
#[case(StubFailure::Unexpected, false)]
#[tokio::test]
async fn persist_failures_are_classified(
    world: World,
    #[case] failure: StubFailure,
    #[case] is_repository: bool,
) {
    let harness = Harness::new(
        StubFind::returning(Some(world.inviter.clone())),
        StubFind::empty(),
        StubFind::returning(Some(world.organization.clone())),
        StubPersist::failing(failure),
    );

    let err = harness
        .service()
        .invite_user(command(&world, "b@x.com", "member"), &())
        .await
        .expect_err("persist fails");

    assert_eq!(err.is_repository(), is_repository);
    assert_eq!(err.is_unknown(), !is_repository);
}
