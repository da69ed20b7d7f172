//! English field names for the work-injury claim form.

use super::Text;

field_group! {
    /// A date split into its printed boxes.
    EnglishDate {
        day => "day",
        month => "month",
        year => "year",
    }
}

field_group! {
    /// Postal address of the insured person.
    EnglishAddress {
        street => "street",
        house_number => "houseNumber",
        entrance => "entrance",
        apartment => "apartment",
        city => "city",
        postal_code => "postalCode",
        po_box => "poBox",
    }
}

field_group! {
    /// Section completed by the treating medical institution.
    EnglishMedicalFields {
        health_fund_member => "healthFundMember",
        nature_of_accident => "natureOfAccident",
        medical_diagnoses => "medicalDiagnoses",
    }
}

form_record! {
    /// Work-injury claim form with English keys.
    EnglishRecord {
        last_name: Text => "lastName",
        first_name: Text => "firstName",
        id_number: Text => "idNumber",
        gender: Text => "gender",
        date_of_birth: EnglishDate => "dateOfBirth",
        address: EnglishAddress => "address",
        landline_phone: Text => "landlinePhone",
        mobile_phone: Text => "mobilePhone",
        job_type: Text => "jobType",
        date_of_injury: EnglishDate => "dateOfInjury",
        time_of_injury: Text => "timeOfInjury",
        accident_location: Text => "accidentLocation",
        accident_address: Text => "accidentAddress",
        accident_description: Text => "accidentDescription",
        injured_body_part: Text => "injuredBodyPart",
        signature: Text => "signature",
        form_filling_date: EnglishDate => "formFillingDate",
        form_receipt_date_at_clinic: EnglishDate => "formReceiptDateAtClinic",
        medical_institution_fields: EnglishMedicalFields => "medicalInstitutionFields",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldTree;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let value = serde_json::to_value(EnglishRecord::default()).unwrap();
        let date = json!({"day": "", "month": "", "year": ""});

        assert_eq!(
            value,
            json!({
                "lastName": "",
                "firstName": "",
                "idNumber": "",
                "gender": "",
                "dateOfBirth": date,
                "address": {
                    "street": "",
                    "houseNumber": "",
                    "entrance": "",
                    "apartment": "",
                    "city": "",
                    "postalCode": "",
                    "poBox": ""
                },
                "landlinePhone": "",
                "mobilePhone": "",
                "jobType": "",
                "dateOfInjury": date,
                "timeOfInjury": "",
                "accidentLocation": "",
                "accidentAddress": "",
                "accidentDescription": "",
                "injuredBodyPart": "",
                "signature": "",
                "formFillingDate": date,
                "formReceiptDateAtClinic": date,
                "medicalInstitutionFields": {
                    "healthFundMember": "",
                    "natureOfAccident": "",
                    "medicalDiagnoses": ""
                }
            })
        );
    }

    #[test]
    fn test_from_object_keeps_exactly_schema_keys() {
        let model_output = json!({
            "firstName": "John",
            "dateOfBirth": {"day": "01", "month": "02", "year": 1980, "era": "CE"},
            "address": "12 Herzl St",
            "favouriteColour": "blue"
        });

        let record = EnglishRecord::from_object(model_output.as_object().unwrap());

        assert_eq!(record.first_name.as_str(), "John");
        assert_eq!(record.date_of_birth.year.as_str(), "1980");
        assert_eq!(record.address, EnglishAddress::default());

        let keys: Vec<&str> = record.top_level_fields().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, EnglishRecord::FIELD_NAMES);
    }
}
