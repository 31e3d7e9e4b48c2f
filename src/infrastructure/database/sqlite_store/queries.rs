// The upsert refreshes registry-side fields only; local_redeemed and
// local_redeemed_at survive a re-download so a pending offline redemption is
// never forgotten.
pub(super) const UPSERT_TICKET: &str = r#"
    INSERT INTO ticket_cache (
        ticket_id,
        event_id,
        redemption_token,
        holder_name,
        holder_phone,
        ticket_type,
        remote_redeemed,
        local_redeemed,
        local_redeemed_at,
        cached_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, NULL, ?8)
    ON CONFLICT(redemption_token) DO UPDATE SET
        ticket_id = excluded.ticket_id,
        event_id = excluded.event_id,
        holder_name = excluded.holder_name,
        holder_phone = excluded.holder_phone,
        ticket_type = excluded.ticket_type,
        remote_redeemed = excluded.remote_redeemed,
        cached_at = excluded.cached_at
"#;

// Snapshot overwrite: drop stale rows but keep locally redeemed tickets,
// whose queued scans have not been reconciled yet.
pub(super) const DELETE_EVENT_TICKETS_UNREDEEMED: &str = r#"
    DELETE FROM ticket_cache
    WHERE event_id = ?1 AND local_redeemed = 0
"#;

pub(super) const SELECT_TICKET_BY_TOKEN: &str = r#"
    SELECT id, ticket_id, event_id, redemption_token, holder_name, holder_phone,
           ticket_type, remote_redeemed, local_redeemed, local_redeemed_at, cached_at
    FROM ticket_cache
    WHERE redemption_token = ?1
"#;

// The compare-and-set. rows_affected = 0 means the token is either unknown
// or already redeemed on one side; callers disambiguate with a follow-up
// select inside the same transaction.
pub(super) const REDEEM_TICKET_LOCALLY: &str = r#"
    UPDATE ticket_cache
    SET local_redeemed = 1,
        local_redeemed_at = ?2
    WHERE redemption_token = ?1
      AND local_redeemed = 0
      AND remote_redeemed = 0
"#;

pub(super) const RECORD_REMOTE_REDEMPTION: &str = r#"
    UPDATE ticket_cache
    SET remote_redeemed = 1
    WHERE redemption_token = ?1
"#;

pub(super) const INSERT_PENDING_SCAN: &str = r#"
    INSERT INTO scan_queue (
        redemption_token,
        scanned_at,
        sync_state,
        sync_error,
        attempts,
        synced_at,
        created_at
    ) VALUES (?1, ?2, 'pending', NULL, 0, NULL, ?3)
"#;

pub(super) const SELECT_PENDING_SCANS: &str = r#"
    SELECT id, redemption_token, scanned_at, sync_state, sync_error, attempts,
           synced_at, created_at
    FROM scan_queue
    WHERE sync_state = 'pending'
    ORDER BY scanned_at ASC, id ASC
"#;

pub(super) const MARK_SCAN_SYNCED: &str = r#"
    UPDATE scan_queue
    SET sync_state = 'synced',
        synced_at = ?2,
        sync_error = NULL
    WHERE id = ?1
"#;

pub(super) const MARK_SCAN_FAILED: &str = r#"
    UPDATE scan_queue
    SET sync_state = 'failed',
        sync_error = ?2,
        attempts = attempts + 1
    WHERE id = ?1
"#;

pub(super) const PRUNE_SYNCED_SCANS: &str = r#"
    DELETE FROM scan_queue
    WHERE sync_state = 'synced'
"#;

pub(super) const COUNT_UNSETTLED_SCANS: &str = r#"
    SELECT COUNT(*) as count
    FROM scan_queue
    WHERE sync_state IN ('pending', 'failed')
"#;

pub(super) const UPSERT_EVENT_METADATA: &str = r#"
    INSERT INTO event_cache (event_id, cached_at, ticket_count)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(event_id) DO UPDATE SET
        cached_at = excluded.cached_at,
        ticket_count = excluded.ticket_count
"#;

pub(super) const SELECT_EVENT_METADATA: &str = r#"
    SELECT event_id, cached_at, ticket_count
    FROM event_cache
    WHERE event_id = ?1
"#;

pub(super) const DELETE_EVENT_TICKETS: &str = r#"
    DELETE FROM ticket_cache
    WHERE event_id = ?1
"#;

pub(super) const DELETE_EVENT_METADATA: &str = r#"
    DELETE FROM event_cache
    WHERE event_id = ?1
"#;
