use crate::application::dto::{
    ScheduleDto, ScheduleType, SubmissionDto, ValidationMessageDto, ValidationResultDto,
};
use crate::domain::entities::{
    PostAttempt, RecordMeta, Submission, SubmissionFile, SubmissionParts, ValidationResult,
    WebsiteOptions,
};
use crate::domain::value_objects::Schedule;

pub fn map_submission_dto(dto: SubmissionDto) -> Submission {
    let files = dto
        .files
        .into_iter()
        .map(|file| SubmissionFile {
            id: file.id,
            file_name: file.file_name,
            mime_type: file.mime_type,
            size: file.size,
            order: file.order,
            created_at: file.created_at,
            updated_at: file.updated_at.max(file.created_at),
        })
        .collect();

    let options = dto
        .options
        .into_iter()
        .map(|option| WebsiteOptions {
            id: option.id,
            account_id: option.account_id,
            is_default: option.is_default,
            title: option.data.title,
            tags: option.data.tags,
            rating: option.data.rating,
            created_at: option.created_at,
            updated_at: option.updated_at.max(option.created_at),
        })
        .collect();

    let posts = dto
        .posts
        .into_iter()
        .map(|post| PostAttempt {
            id: post.id,
            state: post.state,
            created_at: post.created_at,
            completed_at: post.completed_at,
        })
        .collect();

    let validations = dto.validations.into_iter().map(map_validation).collect();

    Submission::new(SubmissionParts {
        meta: RecordMeta::new(dto.id, dto.created_at, dto.updated_at),
        submission_type: dto.submission_type,
        order: dto.order,
        is_scheduled: dto.is_scheduled,
        schedule: map_schedule(dto.schedule),
        is_template: dto.is_template,
        is_multi_submission: dto.is_multi_submission,
        is_archived: dto.is_archived,
        queued_at: dto.post_queue_record.map(|record| record.created_at),
        files,
        options,
        posts,
        validations,
    })
}

fn map_schedule(dto: ScheduleDto) -> Schedule {
    match dto.schedule_type {
        ScheduleType::None => Schedule::None,
        ScheduleType::Single => dto
            .scheduled_for
            .map_or(Schedule::None, |at| Schedule::Once { at }),
        ScheduleType::Recurring => match dto.cron {
            Some(cron) if !cron.trim().is_empty() => Schedule::Recurring {
                cron,
                next_run: dto.scheduled_for,
            },
            _ => Schedule::None,
        },
    }
}

fn map_validation(dto: ValidationResultDto) -> ValidationResult {
    ValidationResult {
        option_id: dto.id,
        errors: dto.errors.into_iter().map(describe_message).collect(),
        warnings: dto.warnings.into_iter().map(describe_message).collect(),
    }
}

fn describe_message(message: ValidationMessageDto) -> String {
    match message.field {
        Some(field) => format!("{field}: {}", message.id),
        None => message.id,
    }
}
